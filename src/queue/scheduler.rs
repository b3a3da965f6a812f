// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{Job, JobStatus};
use crate::domain::services::crawl_engine::{CrawlEngine, JobExecutionError};
use crate::infrastructure::metrics::{JOBS_COMPLETED_TOTAL, JOB_DURATION_SECONDS};
use chrono::Utc;
use metrics::{counter, histogram};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 任务调度器
///
/// 固定容量的工作池，每个任务占用一个工作槽位。池满时任务无界排队。
pub struct Scheduler {
    engine: Arc<CrawlEngine>,
    /// 工作槽位
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl Scheduler {
    /// 创建新的任务调度器实例
    ///
    /// # 参数
    ///
    /// * `engine` - 爬取引擎
    /// * `capacity` - 工作池容量，至少为1
    pub fn new(engine: Arc<CrawlEngine>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            engine,
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前空闲的工作槽位数
    pub fn available_workers(&self) -> usize {
        self.permits.available_permits()
    }

    /// 提交任务
    ///
    /// 立即返回；遍历在工作槽位可用时异步执行。遍历结束后（正常结束、
    /// 返回错误或panic）完成钩子恰好执行一次状态迁移。
    ///
    /// # 返回值
    ///
    /// 返回一个句柄，完成后产出任务的终态
    pub fn submit(&self, job: Arc<Job>) -> JoinHandle<JobStatus> {
        let engine = self.engine.clone();
        let permits = self.permits.clone();

        tokio::spawn(async move {
            let outcome = match permits.acquire_owned().await {
                Ok(_permit) => {
                    let worker_job = job.clone();
                    // Run on a separate task so a panic surfaces as a JoinError
                    let worker = tokio::spawn(async move { engine.run(&worker_job).await });
                    match worker.await {
                        Ok(result) => result.map(|_| ()),
                        Err(join_error) => Err(JobExecutionError::Panicked(join_error.to_string())),
                    }
                }
                Err(_) => Err(JobExecutionError::SchedulerClosed),
            };

            complete(&job, outcome)
        })
    }

    /// 关闭工作池，之后提交的任务会直接失败
    pub fn close(&self) {
        self.permits.close();
    }
}

/// 完成钩子：根据遍历结果执行唯一一次状态迁移
fn complete(job: &Job, outcome: Result<(), JobExecutionError>) -> JobStatus {
    match outcome {
        Ok(()) => {
            job.finish(JobStatus::Done);
        }
        Err(e) => {
            error!(job_id = %job.id(), "Error during search execution: {}", e);
            job.finish(JobStatus::Failed);
        }
    }

    let status = job.status();
    let elapsed = (Utc::now() - job.created_at()).num_milliseconds().max(0) as f64 / 1000.0;
    counter!(JOBS_COMPLETED_TOTAL, "status" => status.to_string()).increment(1);
    histogram!(JOB_DURATION_SECONDS).record(elapsed);
    info!(job_id = %job.id(), %status, "Job finished in {:.3}s", elapsed);

    status
}
