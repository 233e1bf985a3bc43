// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括域名正则、URL处理、字面量反转义、错误类型与日志初始化
pub mod dns;
pub mod errors;
pub mod telemetry;
pub mod text_encoding;
pub mod url_utils;
