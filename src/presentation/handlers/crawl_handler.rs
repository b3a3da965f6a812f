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

use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    application::{
        dto::crawl_request::{CrawlRequestDto, CrawlResponseDto},
        use_cases::crawl_job_use_case::CrawlJobService,
    },
    presentation::errors::AppError,
};

/// 创建新的爬取任务
///
/// 请求体无法解析时按缺少搜索词处理
pub async fn create_crawl(
    Extension(service): Extension<Arc<CrawlJobService>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: CrawlRequestDto = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Unreadable crawl request body: {}", e);
        CrawlRequestDto::default()
    });

    // The ticket's completion handle is not needed here; the job keeps running
    let ticket = service.create_job(payload)?;
    Ok((StatusCode::OK, Json(CrawlResponseDto { id: ticket.id })))
}

/// 获取爬取任务详情
pub async fn get_crawl(
    Extension(service): Extension<Arc<CrawlJobService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = service.get_job(&id)?;
    Ok((StatusCode::OK, Json(snapshot)))
}
