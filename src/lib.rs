// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含请求DTO和爬取任务用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和任务注册表
pub mod domain;

/// 引擎模块
///
/// 实现页面内容抓取
pub mod engines;

/// 基础设施模块
///
/// 提供指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 队列模块
///
/// 实现任务调度功能
pub mod queue;

/// 工具模块
///
/// 提供日志初始化等辅助功能
pub mod utils;
