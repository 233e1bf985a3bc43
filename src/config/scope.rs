// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::dns::subdomain_regex;
use regex::Regex;
use std::collections::HashMap;

/// 目标范围配置
///
/// 为每个目标域名预编译一个匹配正则，由爬取服务通过 [`ScopeConfig::domain_regex`] 查询
#[derive(Debug, Clone, Default)]
pub struct ScopeConfig {
    domains: Vec<String>,
    regexps: HashMap<String, Regex>,
}

impl ScopeConfig {
    /// 根据域名列表创建范围配置
    ///
    /// # 参数
    ///
    /// * `domains` - 目标根域名，统一转为小写并去掉末尾的点，空字符串被忽略
    ///
    /// # 返回值
    ///
    /// * `Ok(ScopeConfig)` - 范围配置
    /// * `Err(regex::Error)` - 某个域名的正则编译失败
    pub fn new<I, S>(domains: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scope = Self::default();
        for domain in domains {
            scope.add_domain(domain.as_ref())?;
        }
        Ok(scope)
    }

    /// 添加一个目标域名，已存在时忽略
    pub fn add_domain(&mut self, domain: &str) -> Result<(), regex::Error> {
        let key = canonical(domain);
        if key.is_empty() || self.regexps.contains_key(&key) {
            return Ok(());
        }
        let re = subdomain_regex(&key)?;
        self.regexps.insert(key.clone(), re);
        self.domains.push(key);
        Ok(())
    }

    /// 已配置的目标域名，按添加顺序
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// 获取目标域名的匹配正则
    ///
    /// 只有已配置的域名才有正则，未知域名返回 `None`
    pub fn domain_regex(&self, domain: &str) -> Option<Regex> {
        self.regexps.get(&canonical(domain)).cloned()
    }
}

fn canonical(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_lowercase()
}
