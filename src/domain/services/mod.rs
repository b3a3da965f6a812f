// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - URL校验（url_validator）：域名范围和链接过滤规则
/// - 链接提取（link_extractor）：从页面内容中提取范围内的链接
/// - ID生成（id_generator）：生成任务ID
/// - 爬取引擎（crawl_engine）：单个任务的广度优先遍历
pub mod crawl_engine;
pub mod id_generator;
pub mod link_extractor;
pub mod url_validator;
