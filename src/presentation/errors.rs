// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::use_cases::crawl_job_use_case::CrawlJobError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.0.downcast::<CrawlJobError>() {
            Ok(err) => err.into(),
            Err(other) => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl From<CrawlJobError> for (StatusCode, String) {
    fn from(err: CrawlJobError) -> Self {
        let status = match err {
            CrawlJobError::Validation(_) => StatusCode::BAD_REQUEST,
            CrawlJobError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CrawlJobError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, err.to_string())
    }
}
