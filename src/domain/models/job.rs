// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;

use crate::domain::services::url_validator::DomainScope;

/// 关键词爬取任务实体
///
/// 任务创建后只有状态和命中URL列表会被修改，且只由执行该任务的工作器修改。
/// 查询方可以在任务执行过程中读取到部分结果。
#[derive(Debug)]
pub struct Job {
    /// 任务唯一标识符（8位字母数字）
    id: String,
    /// 小写化后的搜索词
    search_term: String,
    /// 起始URL
    start_url: String,
    /// 域名范围（scheme + host）
    domain_scope: DomainScope,
    /// 创建时间
    created_at: DateTime<Utc>,
    /// 可变部分
    state: RwLock<JobState>,
}

#[derive(Debug)]
struct JobState {
    status: JobStatus,
    matched_urls: Vec<String>,
    completed_at: Option<DateTime<Utc>>,
}

/// 任务状态枚举
///
/// Active → Done/Failed，终态之后不再变化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    /// 执行中
    #[default]
    Active,
    /// 已完成
    Done,
    /// 已失败
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Active)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Active => write!(f, "ACTIVE"),
            JobStatus::Done => write!(f, "DONE"),
            JobStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// 任务快照
///
/// 查询接口返回的只读视图
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobSnapshot {
    pub id: String,
    pub status: JobStatus,
    pub urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// 创建新的任务
    ///
    /// # 参数
    ///
    /// * `id` - 任务ID
    /// * `keyword` - 搜索词，内部统一转为小写
    /// * `start_url` - 起始URL
    /// * `domain_scope` - 从起始URL推导出的域名范围
    pub fn new(
        id: impl Into<String>,
        keyword: &str,
        start_url: impl Into<String>,
        domain_scope: DomainScope,
    ) -> Self {
        Self {
            id: id.into(),
            search_term: keyword.to_lowercase(),
            start_url: start_url.into(),
            domain_scope,
            created_at: Utc::now(),
            state: RwLock::new(JobState {
                status: JobStatus::Active,
                matched_urls: Vec::new(),
                completed_at: None,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    pub fn domain_scope(&self) -> &DomainScope {
        &self.domain_scope
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> JobStatus {
        self.state.read().status
    }

    pub fn matched_urls(&self) -> Vec<String> {
        self.state.read().matched_urls.clone()
    }

    /// 追加命中的URL
    ///
    /// 已存在的URL和终态任务都会被忽略，返回是否实际追加
    pub fn record_match(&self, url: &str) -> bool {
        let mut state = self.state.write();
        if state.status.is_terminal() || state.matched_urls.iter().any(|u| u == url) {
            return false;
        }
        state.matched_urls.push(url.to_string());
        true
    }

    /// 将任务从 Active 迁移到终态
    ///
    /// 只有第一次调用生效，返回是否发生了迁移
    pub fn finish(&self, status: JobStatus) -> bool {
        if !status.is_terminal() {
            return false;
        }
        let mut state = self.state.write();
        if state.status.is_terminal() {
            return false;
        }
        state.status = status;
        state.completed_at = Some(Utc::now());
        true
    }

    /// 生成当前状态的快照
    pub fn snapshot(&self) -> JobSnapshot {
        let state = self.state.read();
        JobSnapshot {
            id: self.id.clone(),
            status: state.status,
            urls: state.matched_urls.clone(),
            created_at: self.created_at,
            completed_at: state.completed_at,
        }
    }
}
