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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 默认的爬虫 User-Agent
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 应用程序配置设置
///
/// 包含爬取、目标范围、数据源过滤、日志和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 爬取配置
    pub crawl: CrawlSettings,
    /// 目标范围配置
    pub scope: ScopeSettings,
    /// 数据源过滤配置
    pub source_filter: SourceFilterSettings,
    /// 日志配置
    pub logging: LoggingSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 爬取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 全局同时运行的爬取会话上限
    pub max_sessions: usize,
    /// 单个会话的总时长上限（秒）
    pub session_timeout_secs: u64,
    /// 单个请求的超时时间（秒）
    pub request_timeout_secs: u64,
    /// 单个会话内同时进行的请求数
    pub concurrent_requests: usize,
    /// 单个会话内对同一主机同时进行的请求数
    pub concurrent_requests_per_domain: usize,
    /// 请求间隔基准值（毫秒）
    pub request_delay_ms: u64,
    /// 是否在 0.5 到 1.5 倍之间随机化请求间隔
    pub randomize_delay: bool,
    /// 跟随链接的最大深度，种子页为 0
    pub max_depth: usize,
    /// 固定的 User-Agent
    pub user_agent: String,
}

impl CrawlSettings {
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_sessions: 50,
            session_timeout_secs: 30,
            request_timeout_secs: 10,
            concurrent_requests: 3,
            concurrent_requests_per_domain: 3,
            request_delay_ms: 250,
            randomize_delay: true,
            max_depth: 2,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// 目标范围配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeSettings {
    /// 目标根域名列表
    pub domains: Vec<String>,
}

/// 数据源过滤配置设置
///
/// `include` 为 true 时 `sources` 是允许列表，为 false 时是拒绝列表
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceFilterSettings {
    /// 是否为允许列表语义
    pub include: bool,
    /// 数据源名称列表（大小写不敏感）
    pub sources: Vec<String>,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 默认的 EnvFilter 指令，`RUST_LOG` 存在时以其为准
    pub filter: String,
    /// 是否输出 JSON 格式日志
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn,subcrawl=info".to_string(),
            json: false,
        }
    }
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动 Prometheus 导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从默认值、`config/` 目录与环境变量加载配置
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// 加载配置，可额外指定一个必须存在的配置文件
    ///
    /// 优先级从低到高：默认值、`config/default`、`config/{APP_ENVIRONMENT}`、
    /// 指定文件、`SUBCRAWL__` 前缀的环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let defaults = CrawlSettings::default();
        let logging = LoggingSettings::default();

        let mut builder = Config::builder()
            // Crawl defaults
            .set_default("crawl.max_sessions", defaults.max_sessions as u64)?
            .set_default("crawl.session_timeout_secs", defaults.session_timeout_secs)?
            .set_default("crawl.request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("crawl.concurrent_requests", defaults.concurrent_requests as u64)?
            .set_default(
                "crawl.concurrent_requests_per_domain",
                defaults.concurrent_requests_per_domain as u64,
            )?
            .set_default("crawl.request_delay_ms", defaults.request_delay_ms)?
            .set_default("crawl.randomize_delay", defaults.randomize_delay)?
            .set_default("crawl.max_depth", defaults.max_depth as u64)?
            .set_default("crawl.user_agent", defaults.user_agent)?
            // Scope and source filter
            .set_default("scope.domains", Vec::<String>::new())?
            .set_default("source_filter.include", false)?
            .set_default("source_filter.sources", Vec::<String>::new())?
            // Logging and metrics
            .set_default("logging.filter", logging.filter)?
            .set_default("logging.json", logging.json)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix("SUBCRAWL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scope.domains")
                    .with_list_parse_key("source_filter.sources")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
