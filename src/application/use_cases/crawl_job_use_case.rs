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
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use validator::Validate;

use crate::{
    application::dto::crawl_request::CrawlRequestDto,
    config::settings::CrawlerSettings,
    domain::{
        models::job::{Job, JobSnapshot, JobStatus},
        repositories::job_registry::{JobRegistry, RegistryError},
        services::{
            crawl_engine::CrawlEngine,
            id_generator::{IdGenerator, RandomIdGenerator},
            link_extractor::LinkExtractor,
            url_validator,
        },
    },
    engines::{
        reqwest_engine::ReqwestFetcher,
        traits::{ContentFetcher, FetchError},
    },
    infrastructure::metrics::JOBS_CREATED_TOTAL,
    queue::scheduler::Scheduler,
};

pub const EMPTY_KEYWORD_MESSAGE: &str = "Keyword cannot be null or empty";
pub const KEYWORD_LENGTH_MESSAGE: &str = "The search term must be between 4 and 32 characters.";
pub const MISSING_BASE_URL_MESSAGE: &str = "BASE_URL environment variable is not set or empty.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrawlJobError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Configuration(String),
    #[error("Search ID not found")]
    NotFound(String),
}

/// 任务创建回执
///
/// `completion` 在任务进入终态后产出最终状态，HTTP 层直接丢弃即可
#[derive(Debug)]
pub struct JobTicket {
    pub id: String,
    pub completion: JoinHandle<JobStatus>,
}

/// 关键词爬取任务服务
///
/// 负责校验请求、注册任务并交给调度器执行，以及按ID查询任务。
pub struct CrawlJobService {
    settings: CrawlerSettings,
    registry: JobRegistry,
    scheduler: Scheduler,
    id_generator: Arc<dyn IdGenerator>,
}

impl CrawlJobService {
    pub fn new(
        settings: CrawlerSettings,
        registry: JobRegistry,
        scheduler: Scheduler,
        id_generator: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            settings,
            registry,
            scheduler,
            id_generator,
        }
    }

    /// 使用指定的抓取器组装服务
    ///
    /// 引擎、调度器和注册表都按配置新建，ID使用随机生成器
    pub fn with_fetcher(settings: CrawlerSettings, fetcher: Arc<dyn ContentFetcher>) -> Self {
        let extractor = LinkExtractor::new(settings.allow_subdomains);
        let engine = Arc::new(CrawlEngine::new(fetcher, extractor, settings.max_pages));
        let scheduler = Scheduler::new(engine, settings.worker_pool_size);

        Self::new(
            settings,
            JobRegistry::new(),
            scheduler,
            Arc::new(RandomIdGenerator),
        )
    }

    /// 使用基于 reqwest 的抓取器组装服务
    pub fn from_settings(settings: &CrawlerSettings) -> Result<Self, FetchError> {
        let fetcher = ReqwestFetcher::from_settings(settings)?;
        Ok(Self::with_fetcher(settings.clone(), Arc::new(fetcher)))
    }

    /// 替换ID生成器
    pub fn with_id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// 创建爬取任务
    ///
    /// 校验失败时不会注册任何任务。注册成功后任务立即对查询可见，
    /// 状态为 Active，遍历由调度器异步执行。
    ///
    /// # 返回值
    ///
    /// * `Ok(JobTicket)` - 新任务的ID和完成句柄
    /// * `Err(CrawlJobError::Validation)` - 搜索词为空或长度不在 4 到 32 之间
    /// * `Err(CrawlJobError::Configuration)` - 起始URL未配置或无法解析
    pub fn create_job(&self, request: CrawlRequestDto) -> Result<JobTicket, CrawlJobError> {
        let keyword = match request.keyword.as_deref() {
            Some(keyword) if !keyword.trim().is_empty() => keyword,
            _ => return Err(CrawlJobError::Validation(EMPTY_KEYWORD_MESSAGE.to_string())),
        };

        request
            .validate()
            .map_err(|_| CrawlJobError::Validation(KEYWORD_LENGTH_MESSAGE.to_string()))?;

        let configured = self
            .settings
            .start_url()
            .ok_or_else(|| CrawlJobError::Configuration(MISSING_BASE_URL_MESSAGE.to_string()))?;
        let (start_url, scope) = url_validator::parse_start_url(configured)
            .map_err(|e| CrawlJobError::Configuration(e.to_string()))?;

        let job = loop {
            let id = self.id_generator.generate();
            match self
                .registry
                .create(Job::new(id, keyword, start_url.as_str(), scope.clone()))
            {
                Ok(job) => break job,
                Err(RegistryError::AlreadyExists(id)) => {
                    debug!("Generated job id {} is taken, retrying", id);
                }
            }
        };

        counter!(JOBS_CREATED_TOTAL).increment(1);
        info!(job_id = %job.id(), "Created search job for '{}'", job.search_term());

        let id = job.id().to_string();
        let completion = self.scheduler.submit(job);
        Ok(JobTicket { id, completion })
    }

    /// 按ID查询任务
    ///
    /// 执行中的任务返回当前的部分结果
    pub fn get_job(&self, id: &str) -> Result<JobSnapshot, CrawlJobError> {
        self.registry
            .get(id)
            .map(|job| job.snapshot())
            .ok_or_else(|| CrawlJobError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
#[path = "crawl_job_use_case_test.rs"]
mod tests;
