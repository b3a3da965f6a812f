// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 创建爬取任务请求
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
pub struct CrawlRequestDto {
    /// 搜索词，长度 4 到 32 个字符
    #[serde(default)]
    #[validate(length(min = 4, max = 32))]
    pub keyword: Option<String>,
}

impl CrawlRequestDto {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
        }
    }
}

/// 创建爬取任务响应
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CrawlResponseDto {
    pub id: String,
}
