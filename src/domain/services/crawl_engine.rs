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

use metrics::counter;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::job::{Job, JobStatus};
use crate::domain::services::link_extractor::LinkExtractor;
use crate::engines::traits::ContentFetcher;
use crate::infrastructure::metrics::{FETCH_FAILURES_TOTAL, MATCHES_TOTAL, PAGES_FETCHED_TOTAL};

/// 每个任务最多访问的页面数
pub const MAX_PAGES: usize = 100;

/// 任务执行错误
///
/// 逸出遍历循环的意外错误，任务会被标记为 Failed，已有的部分结果保留。
#[derive(Error, Debug)]
pub enum JobExecutionError {
    #[error("Malformed page URL {url}: {source}")]
    MalformedPageUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Crawl task panicked: {0}")]
    Panicked(String),
    #[error("Worker pool is closed")]
    SchedulerClosed,
}

/// 一次遍历的统计结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// 按处理顺序排列的已访问URL
    pub visited: Vec<String>,
    /// 命中数量
    pub matched: usize,
    /// 结束时前沿队列中剩余的URL数量
    pub frontier_remaining: usize,
}

/// 单个任务的遍历状态，只由执行该任务的工作器持有
#[derive(Debug, Default)]
struct Traversal {
    visited: HashSet<String>,
    visit_order: Vec<String>,
    frontier: VecDeque<String>,
    queued: HashSet<String>,
}

impl Traversal {
    fn seeded(start_url: &str) -> Self {
        let mut traversal = Self::default();
        traversal.enqueue(start_url.to_string());
        traversal
    }

    /// 取出下一个未访问的URL并标记为已访问
    fn next(&mut self) -> Option<String> {
        while let Some(url) = self.frontier.pop_front() {
            self.queued.remove(&url);
            if self.visited.contains(&url) {
                continue;
            }
            self.visited.insert(url.clone());
            self.visit_order.push(url.clone());
            return Some(url);
        }
        None
    }

    /// 入队，已访问或已在队列中的URL被忽略
    fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.frontier.push_back(url);
        true
    }
}

/// 爬取引擎
///
/// 对单个任务执行广度优先遍历：依次抓取前沿队列中的页面，检查搜索词，
/// 提取范围内的新链接。单个页面抓取失败只会跳过该页面。
pub struct CrawlEngine {
    fetcher: Arc<dyn ContentFetcher>,
    extractor: LinkExtractor,
    max_pages: usize,
}

impl CrawlEngine {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, extractor: LinkExtractor, max_pages: usize) -> Self {
        Self {
            fetcher,
            extractor,
            max_pages,
        }
    }

    /// 执行任务的遍历
    ///
    /// 前沿队列为空或已访问页面数达到上限时结束，并将任务标记为 Done。
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlReport)` - 遍历正常结束
    /// * `Err(JobExecutionError)` - 遍历过程中出现意外错误，状态由调用方处理
    #[instrument(skip_all, fields(job_id = %job.id()))]
    pub async fn run(&self, job: &Job) -> Result<CrawlReport, JobExecutionError> {
        info!(
            "Starting search for '{}' from {} (scope {}, fetcher {})",
            job.search_term(),
            job.start_url(),
            job.domain_scope(),
            self.fetcher.name()
        );

        let mut traversal = Traversal::seeded(job.start_url());

        while traversal.visited.len() < self.max_pages {
            let Some(url) = traversal.next() else {
                break;
            };
            self.process_url(job, &url, &mut traversal).await?;
        }

        job.finish(JobStatus::Done);

        let report = CrawlReport {
            visited: traversal.visit_order,
            matched: job.matched_urls().len(),
            frontier_remaining: traversal.frontier.len(),
        };
        info!(
            "Search completed. Pages visited: {}, queue size: {}, pages containing the term: {}",
            report.visited.len(),
            report.frontier_remaining,
            report.matched
        );
        Ok(report)
    }

    async fn process_url(
        &self,
        job: &Job,
        url: &str,
        traversal: &mut Traversal,
    ) -> Result<(), JobExecutionError> {
        info!("Processing URL: {}", url);

        let content = match self.fetcher.fetch(url).await {
            Ok(content) => content,
            Err(e) => {
                counter!(FETCH_FAILURES_TOTAL, "kind" => e.kind()).increment(1);
                warn!("Skipping URL due to fetch error: {} - {}", url, e);
                return Ok(());
            }
        };
        counter!(PAGES_FETCHED_TOTAL).increment(1);

        if content.to_lowercase().contains(job.search_term()) && job.record_match(url) {
            counter!(MATCHES_TOTAL).increment(1);
            info!("Search term '{}' found in: {}", job.search_term(), url);
        }

        let links = self
            .extractor
            .extract(url, &content, job.domain_scope())
            .map_err(|source| JobExecutionError::MalformedPageUrl {
                url: url.to_string(),
                source,
            })?;

        for link in links {
            if traversal.enqueue(link.clone()) {
                debug!("Added new link to queue: {}", link);
            }
        }

        Ok(())
    }
}
