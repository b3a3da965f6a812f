// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：爬取任务及其状态
/// - 仓库（repositories）：任务注册表
/// - 服务（services）：URL校验、链接提取、ID生成和爬取引擎
pub mod models;
pub mod repositories;
pub mod services;
