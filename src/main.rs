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

use clap::Parser;
use futures::future::join_all;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use subcrawl::config::scope::ScopeConfig;
use subcrawl::config::settings::{Settings, SourceFilterSettings};
use subcrawl::domain::models::context::CrawlContext;
use subcrawl::domain::services::crawl_service::CrawlService;
use subcrawl::domain::services::source_filter::enabled_sources;
use subcrawl::engines::crawl_gate::CrawlGate;
use subcrawl::infrastructure::metrics;
use subcrawl::utils::telemetry;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 从网页归档站点中发现子域名
#[derive(Parser, Debug)]
#[command(name = "subcrawl", version, about)]
struct Cli {
    /// 目标根域名，与配置中的 scope.domains 合并
    domains: Vec<String>,

    /// 额外的配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 以 JSON 数组输出
    #[arg(long)]
    json: bool,

    /// 列出启用的归档数据源后退出
    #[arg(long)]
    list_sources: bool,

    /// 只使用指定的数据源，可重复
    #[arg(short, long = "source", value_name = "NAME")]
    sources: Vec<String>,

    /// 将 --source 视为排除列表
    #[arg(long, requires = "sources")]
    exclude: bool,
}

/// 主函数
///
/// 加载配置，为每个目标域名查询所有启用的归档数据源，合并输出
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut settings = Settings::load(cli.config.as_deref())?;
    if !cli.sources.is_empty() {
        settings.source_filter = SourceFilterSettings {
            include: !cli.exclude,
            sources: cli.sources.clone(),
        };
    }

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.logging);

    let sources = enabled_sources(&settings.source_filter);
    if cli.list_sources {
        for source in &sources {
            println!("{}\t{}", source.name, source.base_url);
        }
        return Ok(());
    }

    // 3. Initialize Prometheus metrics
    if settings.metrics.enabled {
        metrics::init_metrics(&settings.metrics.listen_addr);
    }

    // 4. Build the target scope
    let mut scope = ScopeConfig::new(&settings.scope.domains)?;
    for domain in &cli.domains {
        scope.add_domain(domain)?;
    }
    if scope.domains().is_empty() {
        anyhow::bail!("no target domains given");
    }
    if sources.is_empty() {
        warn!("All archive sources are disabled by the source filter");
    }
    let scope = Arc::new(scope);

    // 5. Initialize the crawl service
    let gate = CrawlGate::new(settings.crawl.max_sessions);
    let service = CrawlService::new(gate, settings.crawl.clone())?;
    let cancel = CancellationToken::new();
    let ctx = CrawlContext::new(scope.clone()).with_cancellation(cancel.clone());

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, returning partial results");
                cancel.cancel();
            }
        }
    });

    info!(
        "Querying {} archive sources for {} domains",
        sources.len(),
        scope.domains().len()
    );

    // 6. Query every source for every domain
    let queries = scope
        .domains()
        .iter()
        .flat_map(|domain| sources.iter().map(move |source| (domain, *source)))
        .map(|(domain, source)| {
            let service = &service;
            let ctx = &ctx;
            async move {
                let result = source.query(service, ctx, domain, domain).await;
                (source.name, domain, result)
            }
        });

    let mut names = BTreeSet::new();
    for (source, domain, result) in join_all(queries).await {
        match result {
            Ok(found) => {
                debug!(source, domain = %domain, count = found.len(), "source finished");
                names.extend(found);
            }
            Err(e) => warn!(source, domain = %domain, error = %e, "source query failed"),
        }
    }

    info!("Found {} names", names.len());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in &names {
            println!("{}", name);
        }
    }

    Ok(())
}
