// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 爬取错误类型
///
/// 仅包含会终止一次爬取调用的错误；抓取、解析等瞬时错误在会话内部消化，
/// 不会出现在这里。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrawlError {
    #[error("crawler error: failed to obtain the configuration from the crawl context")]
    ConfigurationMissing,

    #[error("crawler error: failed to obtain regex object for: {0}")]
    PatternUnavailable(String),
}
