// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// 会话内请求限流器
///
/// 同时限制一个会话的总并发请求数与对每个主机的并发请求数。
/// 每个主机的信号量在首次请求时创建。
#[derive(Clone, Debug)]
pub struct RequestLimiter {
    /// 会话总并发
    total: Arc<Semaphore>,
    /// 存储每个主机的信号量
    per_host: Arc<DashMap<String, Arc<Semaphore>>>,
    /// 每个主机的并发数
    per_host_permits: usize,
}

/// 一次请求持有的许可，丢弃时同时归还两级许可
#[derive(Debug)]
pub struct RequestPermit {
    _host: OwnedSemaphorePermit,
    _total: OwnedSemaphorePermit,
}

impl RequestLimiter {
    /// 创建一个新的RequestLimiter实例
    ///
    /// # 参数
    ///
    /// * `total_permits` - 会话总并发请求数，至少为 1
    /// * `per_host_permits` - 每个主机的并发请求数，至少为 1
    pub fn new(total_permits: usize, per_host_permits: usize) -> Self {
        Self {
            total: Arc::new(Semaphore::new(total_permits.max(1))),
            per_host: Arc::new(DashMap::new()),
            per_host_permits: per_host_permits.max(1),
        }
    }

    /// 为指定主机获取请求许可
    ///
    /// 先获取主机许可再获取总许可，等待某个繁忙主机的请求不会占用总并发。
    pub async fn acquire(&self, host: &str) -> RequestPermit {
        let host_permit = self
            .get_or_create(host)
            .acquire_owned()
            .await
            .expect("host semaphore is never closed");
        let total_permit = self
            .total
            .clone()
            .acquire_owned()
            .await
            .expect("session semaphore is never closed");
        RequestPermit {
            _host: host_permit,
            _total: total_permit,
        }
    }

    /// 当前空闲的会话总许可数
    pub fn available(&self) -> usize {
        self.total.available_permits()
    }

    /// 获取或创建指定主机的信号量
    fn get_or_create(&self, host: &str) -> Arc<Semaphore> {
        self.per_host
            .entry(host.to_ascii_lowercase())
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_permits)))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_per_host_limit() {
        let limiter = RequestLimiter::new(4, 1);
        let _held = limiter.acquire("web.archive.org").await;

        let blocked = tokio::time::timeout(
            Duration::from_millis(20),
            limiter.acquire("WEB.archive.org"),
        )
        .await;
        assert!(blocked.is_err());

        let other = tokio::time::timeout(Duration::from_millis(20), limiter.acquire("archive.is")).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_total_limit_and_release() {
        let limiter = RequestLimiter::new(2, 3);
        let a = limiter.acquire("a.example").await;
        let _b = limiter.acquire("b.example").await;
        assert_eq!(limiter.available(), 0);

        let blocked =
            tokio::time::timeout(Duration::from_millis(20), limiter.acquire("c.example")).await;
        assert!(blocked.is_err());

        drop(a);
        assert_eq!(limiter.available(), 1);
        let _c = limiter.acquire("c.example").await;
    }
}
