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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 兼容旧部署方式的起始URL环境变量
pub const BASE_URL_ENV: &str = "BASE_URL";

/// 应用程序配置设置
///
/// 包含服务器、爬虫和指标导出等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 爬虫配置
    pub crawler: CrawlerSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 爬虫配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 起始URL，缺失时在创建任务时报错而不是启动时
    pub base_url: Option<String>,
    /// 每个任务最多访问的页面数
    pub max_pages: usize,
    /// 工作池容量
    pub worker_pool_size: usize,
    /// 是否允许子域名
    pub allow_subdomains: bool,
    /// 最多跟随的重定向次数
    pub max_redirects: usize,
    /// 单次请求超时（秒），0 表示不限制
    pub request_timeout_secs: u64,
    /// 请求使用的 User-Agent
    pub user_agent: String,
}

/// 指标导出配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出端口
    pub port: u16,
}

impl CrawlerSettings {
    /// 单次请求超时
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// 有效的起始URL
    ///
    /// 去除首尾空白，空字符串视为未配置
    pub fn start_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            max_pages: 100,
            worker_pool_size: 50,
            allow_subdomains: true,
            max_redirects: 10,
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (compatible; keycrawl/0.1)".to_string(),
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `KEYCRAWL__*` 环境变量；未配置 `crawler.base_url` 时回退到 `BASE_URL`。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let defaults = CrawlerSettings::default();
        let mut builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4567)?
            // Default crawler settings
            .set_default("crawler.max_pages", defaults.max_pages as u64)?
            .set_default("crawler.worker_pool_size", defaults.worker_pool_size as u64)?
            .set_default("crawler.allow_subdomains", defaults.allow_subdomains)?
            .set_default("crawler.max_redirects", defaults.max_redirects as u64)?
            .set_default("crawler.request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("crawler.user_agent", defaults.user_agent)?
            // Default metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.port", 9000)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("KEYCRAWL").separator("__"));

        // Legacy deployments only export BASE_URL; it ranks below every other source
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            builder = builder.set_default("crawler.base_url", base_url)?;
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
