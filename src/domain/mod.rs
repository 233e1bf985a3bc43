// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：爬取请求、上下文、结果集合与会话统计
/// - 服务（services）：名称规范化、爬取服务与数据源选择
pub mod models;
pub mod services;
