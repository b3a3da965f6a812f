// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use keycrawl::application::use_cases::crawl_job_use_case::CrawlJobService;
use keycrawl::config::settings::CrawlerSettings;
use keycrawl::domain::models::job::Job;
use keycrawl::domain::services::crawl_engine::{CrawlEngine, MAX_PAGES};
use keycrawl::domain::services::link_extractor::LinkExtractor;
use keycrawl::domain::services::url_validator::DomainScope;
use keycrawl::engines::traits::{ContentFetcher, FetchError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub const SITE: &str = "http://example.com/";

/// 内存中的站点
///
/// 未登记的URL返回404，登记为错误的URL返回对应状态码
#[derive(Default)]
pub struct InMemoryFetcher {
    pages: HashMap<String, Result<String, u16>>,
    delay: Option<Duration>,
    requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Err(status));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 按请求顺序记录的URL
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ContentFetcher for InMemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.pages.get(url) {
            Some(Ok(body)) if body.is_empty() => Err(FetchError::EmptyBody),
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(FetchError::UnexpectedStatus {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(FetchError::UnexpectedStatus {
                status: 404,
                url: url.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

/// 抓取到指定URL时panic的抓取器，其余URL委托给内部站点
pub struct PanickingFetcher {
    pub inner: InMemoryFetcher,
    pub panic_on: String,
}

#[async_trait]
impl ContentFetcher for PanickingFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if url == self.panic_on {
            panic!("simulated worker crash at {}", url);
        }
        self.inner.fetch(url).await
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}

/// 生成指向多个路径的页面
#[allow(dead_code)]
pub fn page_with_links(text: &str, hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!("<a href=\"{}\">link</a>", href))
        .collect();
    format!("<html><body><p>{}</p>{}</body></html>", text, anchors)
}

#[allow(dead_code)]
pub fn engine(fetcher: Arc<dyn ContentFetcher>) -> CrawlEngine {
    CrawlEngine::new(fetcher, LinkExtractor::new(true), MAX_PAGES)
}

#[allow(dead_code)]
pub fn job(id: &str, keyword: &str) -> Job {
    let scope = DomainScope::from_start_url(SITE).expect("valid start url");
    Job::new(id, keyword, SITE, scope)
}

#[allow(dead_code)]
pub fn crawler_settings(base_url: Option<&str>) -> CrawlerSettings {
    CrawlerSettings {
        base_url: base_url.map(str::to_string),
        worker_pool_size: 4,
        ..CrawlerSettings::default()
    }
}

#[allow(dead_code)]
pub fn service(fetcher: Arc<dyn ContentFetcher>, base_url: Option<&str>) -> Arc<CrawlJobService> {
    Arc::new(CrawlJobService::with_fetcher(crawler_settings(base_url), fetcher))
}
