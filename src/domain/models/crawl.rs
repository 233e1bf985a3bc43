// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::collections::HashSet;

/// 爬取请求
///
/// 每次调用构造一次，调用期间不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// 归档站点的基础URL，例如 `https://web.archive.org/web`
    pub seed_base_url: String,
    /// 允许跟随的主机域名
    pub allowed_base_domain: String,
    /// 种子页路径末尾的名称提示
    pub subdomain_hint: String,
    /// 目标根域名
    pub target_domain: String,
}

impl CrawlRequest {
    pub fn new(
        seed_base_url: impl Into<String>,
        allowed_base_domain: impl Into<String>,
        subdomain_hint: impl Into<String>,
        target_domain: impl Into<String>,
    ) -> Self {
        Self {
            seed_base_url: seed_base_url.into(),
            allowed_base_domain: allowed_base_domain.into(),
            subdomain_hint: subdomain_hint.into(),
            target_domain: target_domain.into(),
        }
    }

    /// 构建种子页URL：`base/year/hint`
    pub fn start_url(&self, year: i32) -> String {
        format!(
            "{}/{}/{}",
            self.seed_base_url.trim_end_matches('/'),
            year,
            self.subdomain_hint.trim_start_matches('/')
        )
    }
}

/// 结果收集器
///
/// 一个会话独占的去重集合，插入顺序无关
#[derive(Debug, Clone, Default)]
pub struct ResultCollector {
    names: HashSet<String>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入名称，空字符串被忽略；新名称返回 true
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.is_empty() {
            return false;
        }
        self.names.insert(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names.into_iter().collect()
    }
}

/// 会话统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// 成功抓取的页面数
    pub pages_fetched: usize,
    /// 被跳过的页面数（抓取、状态码、内容类型或任务失败）
    pub fetch_errors: usize,
    /// 解析出的链接数
    pub links_seen: usize,
    /// 收集到的名称数
    pub names_found: usize,
    /// 是否因会话超时结束
    pub timed_out: bool,
    /// 是否因取消结束
    pub cancelled: bool,
}

/// 一次爬取的结果
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// 去重后的名称，无序
    pub names: Vec<String>,
    /// 会话统计
    pub report: CrawlReport,
}

impl CrawlOutcome {
    pub fn new(collector: ResultCollector, mut report: CrawlReport) -> Self {
        report.names_found = collector.len();
        Self {
            names: collector.into_vec(),
            report,
        }
    }

    /// 尚未开始即被取消的结果
    pub fn cancelled() -> Self {
        Self {
            names: Vec::new(),
            report: CrawlReport {
                cancelled: true,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_url_joins_with_single_separator() {
        let request = CrawlRequest::new(
            "https://web.archive.org/web/",
            "web.archive.org",
            "/www.example.com",
            "example.com",
        );
        assert_eq!(
            request.start_url(2024),
            "https://web.archive.org/web/2024/www.example.com"
        );

        let plain = CrawlRequest::new("http://archive.is", "archive.is", "example.com", "example.com");
        assert_eq!(plain.start_url(1999), "http://archive.is/1999/example.com");
    }

    #[test]
    fn test_collector_deduplicates_and_ignores_empty() {
        let mut collector = ResultCollector::new();
        assert!(collector.insert("www.example.com"));
        assert!(!collector.insert("www.example.com"));
        assert!(!collector.insert(""));
        assert!(collector.insert("mail.example.com"));
        assert_eq!(collector.len(), 2);

        let mut names = collector.into_vec();
        names.sort();
        assert_eq!(names, vec!["mail.example.com", "www.example.com"]);
    }

    #[test]
    fn test_outcome_counts_names() {
        let mut collector = ResultCollector::new();
        collector.insert("a.example.com");
        let outcome = CrawlOutcome::new(collector, CrawlReport::default());
        assert_eq!(outcome.report.names_found, 1);
        assert!(CrawlOutcome::cancelled().report.cancelled);
    }
}
