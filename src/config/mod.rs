// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置，包括爬取参数、目标范围与数据源过滤
pub mod settings;

/// 目标范围
///
/// 目标域名与其匹配正则
pub mod scope;
