// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标系统
///
/// 在指定地址启动 Prometheus 导出器并注册爬取相关的指标说明。
/// 地址无效或导出器安装失败时仅记录警告，爬取照常进行。
pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", listen_addr, e);
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

fn describe_metrics() {
    describe_counter!("subcrawl_sessions_total", "Total number of crawl sessions run");
    describe_counter!(
        "subcrawl_pages_fetched_total",
        "Total number of archive pages fetched"
    );
    describe_counter!(
        "subcrawl_fetch_errors_total",
        "Total number of pages skipped after a fetch error"
    );
    describe_counter!(
        "subcrawl_names_found_total",
        "Total number of names collected across sessions"
    );
    describe_histogram!(
        "subcrawl_session_duration_seconds",
        "Duration of crawl sessions in seconds"
    );
}
