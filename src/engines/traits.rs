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

use async_trait::async_trait;
use thiserror::Error;

/// 页面抓取错误类型
///
/// 所有变体都在爬取引擎内部就地恢复：对应URL计为已访问并被跳过。
#[derive(Error, Debug)]
pub enum FetchError {
    /// 传输层错误（连接、TLS、超时等）
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 非200的最终响应
    #[error("Unexpected HTTP status {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },
    /// 响应体为空
    #[error("Empty response body")]
    EmptyBody,
    /// 重定向次数超过上限
    #[error("Too many redirects (limit {limit})")]
    TooManyRedirects { limit: usize },
    /// 重定向响应缺少可用的 Location 头
    #[error("Redirect without usable Location header from {0}")]
    MissingLocation(String),
    /// URL无法解析
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// 用于日志和指标的简短分类
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Request(e) if e.is_timeout() => "timeout",
            FetchError::Request(_) => "transport",
            FetchError::UnexpectedStatus { .. } => "status",
            FetchError::EmptyBody => "empty_body",
            FetchError::TooManyRedirects { .. } => "redirect_loop",
            FetchError::MissingLocation(_) => "redirect",
            FetchError::InvalidUrl(_) => "invalid_url",
        }
    }
}

/// 页面内容抓取特质
///
/// 执行GET请求并跟随重定向，成功时返回非空的响应体文本。
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// 抓取器名称
    fn name(&self) -> &'static str;
}
