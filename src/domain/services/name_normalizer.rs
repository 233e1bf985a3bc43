// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::dns::ANY_SUBDOMAIN_RE;
use crate::utils::text_encoding::unquote_literal;
use once_cell::sync::Lazy;
use regex::Regex;

/// 朴素反转义后残留在名称开头的编码片段
static NAME_STRIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:u[0-9a-f]{4}|20|22|25|2b|2f|3d|3a|40)")
        .expect("name strip pattern is valid")
});

/// 将链接中截取的原始文本规范化为子域名
///
/// 依次执行：去除首尾空白并按双引号字面量反转义（失败时保留原文），
/// 截取第一个主机名形式的片段，转为小写，再反复去除首尾的 `-` 与 `.`
/// 以及开头的编码残留。整个清理过程重复到结果不再变化为止，
/// 因此 `normalize(normalize(x)) == normalize(x)`。
///
/// # 参数
///
/// * `raw` - 原始文本
///
/// # 返回值
///
/// 规范化后的名称，空字符串表示没有可用的名称
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let unescaped =
        unquote_literal(&format!("\"{}\"", trimmed)).unwrap_or_else(|_| trimmed.to_string());

    let mut current = unescaped;
    loop {
        let next = clean_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// 单次清理：截取、小写、剥离残留
fn clean_pass(text: &str) -> String {
    let Some(found) = ANY_SUBDOMAIN_RE.find(text) else {
        return String::new();
    };
    let lowered = found.as_str().to_ascii_lowercase();
    strip_artifacts(&lowered).to_string()
}

fn strip_artifacts(name: &str) -> &str {
    let mut current = name;
    // Every productive iteration removes at least one byte
    for _ in 0..=name.len() {
        current = current.trim_matches(|c| c == '-' || c == '.');
        match NAME_STRIP_RE.find(current) {
            Some(m) => current = &current[m.end()..],
            None => break,
        }
    }
    current
}

/// 从链接中提取属于目标域名的名称
///
/// 先用域名正则截取匹配部分并规范化，规范化结果必须仍然匹配域名正则。
///
/// # 参数
///
/// * `pattern` - 目标域名的匹配正则
/// * `link` - 解析后的绝对URL
///
/// # 返回值
///
/// * `Some(String)` - 属于目标域名的名称
/// * `None` - 链接中没有可用的名称
pub fn extract_name(pattern: &Regex, link: &str) -> Option<String> {
    let found = pattern.find(link)?;
    let name = normalize(found.as_str());
    if name.is_empty() || !pattern.is_match(&name) {
        return None;
    }
    Some(name)
}
