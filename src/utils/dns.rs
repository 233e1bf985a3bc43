// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

/// 单个或多个以点结尾的DNS标签
pub const SUBDOMAIN_LABELS: &str =
    r"(?:(?:[a-zA-Z0-9]|[_a-zA-Z0-9][_a-zA-Z0-9-]{0,61}[a-zA-Z0-9])[.])";

/// 匹配任意带点主机名的正则表达式，顶级标签为 2-61 个字母
pub static ANY_SUBDOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{SUBDOMAIN_LABELS}+[a-zA-Z]{{2,61}}"))
        .expect("any-subdomain pattern is valid")
});

/// 为目标域名构建匹配正则
///
/// 匹配目标域名本身及其任意子域名，大小写不敏感，两端要求单词边界，
/// 以免 `notexample.com` 或 `example.community` 被当作 `example.com` 的名称。
///
/// # 参数
///
/// * `domain` - 目标域名，例如 `example.com`
///
/// # 返回值
///
/// * `Ok(Regex)` - 编译后的匹配器
/// * `Err(regex::Error)` - 正则编译失败
pub fn subdomain_regex(domain: &str) -> Result<Regex, regex::Error> {
    let domain = domain.trim().trim_end_matches('.');
    Regex::new(&format!(
        r"(?i)\b{SUBDOMAIN_LABELS}*{}\b",
        regex::escape(domain)
    ))
}
