// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置、环境变量和目标范围
pub mod config;

/// 领域模块
///
/// 包含爬取请求与结果模型、名称规范化、爬取服务和数据源选择
pub mod domain;

/// 引擎模块
///
/// 实现网页抓取引擎与并发控制
pub mod engines;

/// 基础设施模块
///
/// 提供归档数据源目录与指标导出
pub mod infrastructure;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
