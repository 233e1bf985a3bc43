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

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// 默认的全局爬取会话上限
pub const DEFAULT_CAPACITY: usize = 50;

/// 全局爬取闸门
///
/// 限制整个系统同时运行的爬取会话数量，与发起爬取的数据源数量无关。
/// 由组装根创建一次，克隆后注入到每个爬取服务，所有克隆共享同一个许可池。
#[derive(Clone, Debug)]
pub struct CrawlGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// 爬取许可
///
/// 在一个会话的整个生命周期内持有，丢弃时归还许可。
#[derive(Debug)]
pub struct CrawlPermit {
    _permit: OwnedSemaphorePermit,
}

impl CrawlGate {
    /// 创建新的爬取闸门
    ///
    /// # 参数
    ///
    /// * `capacity` - 许可总数，0 会被提升为 1
    ///
    /// # 返回值
    ///
    /// 返回新的CrawlGate实例
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// 获取一个许可，没有空闲许可时等待
    ///
    /// 等待者按先进先出顺序获得许可。
    pub async fn acquire(&self) -> CrawlPermit {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("crawl gate semaphore is never closed");
        CrawlPermit { _permit: permit }
    }

    /// 尝试立即获取一个许可
    pub fn try_acquire(&self) -> Option<CrawlPermit> {
        self.semaphore
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| CrawlPermit { _permit: permit })
    }

    /// 许可总数
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前空闲的许可数
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// 当前被持有的许可数
    pub fn in_use(&self) -> usize {
        self.capacity - self.available()
    }
}

impl Default for CrawlGate {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
