// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::CrawlerSettings;
use crate::engines::traits::{ContentFetcher, FetchError};
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// 抓取引擎
///
/// 基于reqwest实现的页面抓取器。自动重定向被关闭，
/// 由抓取器自己跟随 3xx 响应以便限制跳转次数。
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    max_redirects: usize,
}

impl ReqwestFetcher {
    /// 创建新的抓取器
    ///
    /// # 参数
    ///
    /// * `user_agent` - 固定的 User-Agent 标识
    /// * `timeout` - 单次请求超时，`None` 表示不限制
    /// * `max_redirects` - 最多跟随的重定向次数
    pub fn new(
        user_agent: &str,
        timeout: Option<Duration>,
        max_redirects: usize,
    ) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none());

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            max_redirects,
        })
    }

    pub fn from_settings(settings: &CrawlerSettings) -> Result<Self, FetchError> {
        Self::new(
            &settings.user_agent,
            settings.request_timeout(),
            settings.max_redirects,
        )
    }
}

#[async_trait]
impl ContentFetcher for ReqwestFetcher {
    /// 执行HTTP GET并返回响应体
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 200 响应且响应体非空
    /// * `Err(FetchError)` - 传输错误、非200响应、空响应体或重定向过多
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut current = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        for _ in 0..=self.max_redirects {
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();

            if status.is_redirection() {
                if let Some(location) = response.headers().get(LOCATION) {
                    let next = location
                        .to_str()
                        .ok()
                        .and_then(|loc| current.join(loc.trim()).ok())
                        .ok_or_else(|| FetchError::MissingLocation(current.to_string()))?;
                    warn!("Redirected to: {}", next);
                    current = next;
                    continue;
                }
            }

            if status != StatusCode::OK {
                return Err(FetchError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: current.to_string(),
                });
            }

            let body = response.text().await?;
            if body.is_empty() {
                return Err(FetchError::EmptyBody);
            }

            debug!(url = %current, bytes = body.len(), "Fetched page");
            return Ok(body);
        }

        Err(FetchError::TooManyRedirects {
            limit: self.max_redirects,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
