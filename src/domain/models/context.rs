// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::scope::ScopeConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 爬取上下文
///
/// 显式携带目标范围配置与取消令牌。范围配置缺失时爬取会以
/// `ConfigurationMissing` 失败。
#[derive(Debug, Clone, Default)]
pub struct CrawlContext {
    scope: Option<Arc<ScopeConfig>>,
    cancel: CancellationToken,
}

impl CrawlContext {
    pub fn new(scope: Arc<ScopeConfig>) -> Self {
        Self {
            scope: Some(scope),
            cancel: CancellationToken::new(),
        }
    }

    /// 不带范围配置的上下文
    pub fn without_scope() -> Self {
        Self::default()
    }

    /// 使用外部的取消令牌
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn scope(&self) -> Option<&Arc<ScopeConfig>> {
        self.scope.as_ref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}
