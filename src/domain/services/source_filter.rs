// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SourceFilterSettings;
use crate::infrastructure::archives::{ArchiveSource, ARCHIVE_SOURCES};

/// 判断数据源是否启用
///
/// 列表为空且 `include` 为 false 时全部启用；名称与列表中某项大小写不敏感地
/// 相等时，由 `include` 决定启用与否（true 为允许列表，false 为拒绝列表）。
///
/// # 参数
///
/// * `name` - 数据源名称
/// * `filter` - 数据源过滤配置
///
/// # 返回值
///
/// 数据源是否启用
pub fn should_enable(name: &str, filter: &SourceFilterSettings) -> bool {
    let listed = filter
        .sources
        .iter()
        .any(|source| source.trim().eq_ignore_ascii_case(name));
    if listed {
        filter.include
    } else {
        !filter.include
    }
}

/// 按过滤配置筛选归档数据源，保持目录顺序
pub fn enabled_sources(filter: &SourceFilterSettings) -> Vec<&'static ArchiveSource> {
    ARCHIVE_SOURCES
        .iter()
        .filter(|source| should_enable(source.name, filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: bool, sources: &[&str]) -> SourceFilterSettings {
        SourceFilterSettings {
            include,
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_deny_list_enables_everything() {
        let filter = filter(false, &[]);
        assert!(should_enable("Wayback", &filter));
        assert_eq!(enabled_sources(&filter).len(), ARCHIVE_SOURCES.len());
    }

    #[test]
    fn test_empty_allow_list_enables_nothing() {
        let filter = filter(true, &[]);
        assert!(!should_enable("Wayback", &filter));
        assert!(enabled_sources(&filter).is_empty());
    }

    #[test]
    fn test_allow_list_is_case_insensitive() {
        let filter = filter(true, &["wayback", "ARQUIVO"]);
        assert!(should_enable("Wayback", &filter));
        assert!(should_enable("Arquivo", &filter));
        assert!(!should_enable("ArchiveIt", &filter));

        let names: Vec<_> = enabled_sources(&filter).iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Arquivo", "Wayback"]);
    }

    #[test]
    fn test_deny_list_disables_listed_sources() {
        let filter = filter(false, &["ArchiveToday"]);
        assert!(!should_enable("archivetoday", &filter));
        assert!(should_enable("Wayback", &filter));
        assert_eq!(enabled_sources(&filter).len(), ARCHIVE_SOURCES.len() - 1);
    }
}
