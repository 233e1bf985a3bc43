// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::context::CrawlContext;
use crate::domain::models::crawl::CrawlRequest;
use crate::domain::services::crawl_service::CrawlService;
use crate::engines::traits::ScraperEngine;
use crate::utils::errors::CrawlError;
use serde::Serialize;

/// 归档数据源
///
/// 每个数据源只是一组爬取参数：从 `base_url/年份/名称` 出发，
/// 只跟随 `base_domain` 之内的链接。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchiveSource {
    /// 数据源名称
    pub name: &'static str,
    /// 归档站点基础URL
    pub base_url: &'static str,
    /// 允许跟随的主机域名
    pub base_domain: &'static str,
}

/// 内置的归档数据源目录，按名称排序
pub const ARCHIVE_SOURCES: &[ArchiveSource] = &[
    ArchiveSource {
        name: "ArchiveIt",
        base_url: "https://wayback.archive-it.org/all",
        base_domain: "wayback.archive-it.org",
    },
    ArchiveSource {
        name: "ArchiveToday",
        base_url: "http://archive.is",
        base_domain: "archive.is",
    },
    ArchiveSource {
        name: "Arquivo",
        base_url: "https://arquivo.pt/wayback",
        base_domain: "arquivo.pt",
    },
    ArchiveSource {
        name: "LoCArchive",
        base_url: "https://webarchive.loc.gov/all",
        base_domain: "webarchive.loc.gov",
    },
    ArchiveSource {
        name: "OpenUKArchive",
        base_url: "https://www.webarchive.org.uk/wayback/archive",
        base_domain: "webarchive.org.uk",
    },
    ArchiveSource {
        name: "UKGovArchive",
        base_url: "https://webarchive.nationalarchives.gov.uk",
        base_domain: "webarchive.nationalarchives.gov.uk",
    },
    ArchiveSource {
        name: "Wayback",
        base_url: "https://web.archive.org/web",
        base_domain: "web.archive.org",
    },
];

impl ArchiveSource {
    /// 按名称查找数据源（大小写不敏感）
    pub fn find(name: &str) -> Option<&'static ArchiveSource> {
        ARCHIVE_SOURCES
            .iter()
            .find(|source| source.name.eq_ignore_ascii_case(name.trim()))
    }

    /// 构建爬取请求
    ///
    /// # 参数
    ///
    /// * `name` - 要查询的名称，作为种子页路径
    /// * `domain` - 目标根域名
    pub fn request(&self, name: &str, domain: &str) -> CrawlRequest {
        CrawlRequest::new(self.base_url, self.base_domain, name, domain)
    }

    /// 通过爬取服务查询该归档站点
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<String>)` - 发现的名称
    /// * `Err(CrawlError)` - 缺少范围配置或目标域名没有匹配正则
    pub async fn query<E: ScraperEngine + 'static>(
        &self,
        service: &CrawlService<E>,
        ctx: &CrawlContext,
        name: &str,
        domain: &str,
    ) -> Result<Vec<String>, CrawlError> {
        service
            .crawl(ctx, self.base_url, self.base_domain, name, domain)
            .await
    }
}
