// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::models::job::Job;

/// 注册表错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Job id already registered: {0}")]
    AlreadyExists(String),
}

/// 任务注册表
///
/// 任务ID到任务状态的并发映射，是查询接口唯一的数据来源。
/// 任务在进程生命周期内不会被删除。
#[derive(Debug, Default, Clone)]
pub struct JobRegistry {
    jobs: Arc<DashMap<String, Arc<Job>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册任务
    ///
    /// # 返回值
    ///
    /// * `Ok(Arc<Job>)` - 注册成功，返回共享的任务句柄
    /// * `Err(RegistryError::AlreadyExists)` - ID已被占用，原任务保持不变
    pub fn create(&self, job: Job) -> Result<Arc<Job>, RegistryError> {
        match self.jobs.entry(job.id().to_string()) {
            Entry::Occupied(entry) => Err(RegistryError::AlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                let job = Arc::new(job);
                entry.insert(job.clone());
                Ok(job)
            }
        }
    }

    /// 根据ID查找任务
    pub fn get(&self, id: &str) -> Option<Arc<Job>> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.jobs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
