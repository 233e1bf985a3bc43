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

use crate::config::settings::CrawlSettings;
use crate::domain::models::context::CrawlContext;
use crate::domain::models::crawl::{CrawlOutcome, CrawlReport, CrawlRequest, ResultCollector};
use crate::domain::services::name_normalizer::extract_name;
use crate::engines::crawl_gate::CrawlGate;
use crate::engines::host_semaphore::RequestLimiter;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::{EngineError, ScrapeRequest, ScraperEngine};
use crate::utils::errors::CrawlError;
use crate::utils::url_utils::{resolve_url, url_within_domain};
use chrono::{Datelike, Utc};
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, trace, Instrument, Span};
use url::Url;
use uuid::Uuid;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// 爬取服务
///
/// 从归档站点的种子页出发，在允许的主机范围内跟随链接，
/// 并从链接中收集属于目标域名的名称。所有会话共享同一个 [`CrawlGate`]。
pub struct CrawlService<E: ScraperEngine = ReqwestEngine> {
    /// 抓取引擎
    engine: Arc<E>,
    /// 全局会话闸门
    gate: CrawlGate,
    /// 爬取配置
    settings: CrawlSettings,
}

impl CrawlService<ReqwestEngine> {
    /// 创建新的爬取服务实例
    ///
    /// # 参数
    ///
    /// * `gate` - 全局会话闸门
    /// * `settings` - 爬取配置
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlService)` - 爬取服务
    /// * `Err(EngineError)` - HTTP客户端构建失败
    pub fn new(gate: CrawlGate, settings: CrawlSettings) -> Result<Self, EngineError> {
        let engine = ReqwestEngine::new(&settings.user_agent, settings.request_timeout())?;
        Ok(Self::new_with_engine(Arc::new(engine), gate, settings))
    }
}

/// 一个页面任务的结果
struct PageVisit {
    url: Url,
    depth: usize,
    result: Result<Vec<Url>, EngineError>,
}

/// 会话循环独占的状态
struct SessionState {
    collector: ResultCollector,
    report: CrawlReport,
    visited: HashSet<String>,
    tasks: JoinSet<PageVisit>,
    limiter: RequestLimiter,
    allowed_domain: String,
}

impl<E: ScraperEngine + 'static> CrawlService<E> {
    /// 使用自定义抓取引擎创建爬取服务实例
    pub fn new_with_engine(engine: Arc<E>, gate: CrawlGate, settings: CrawlSettings) -> Self {
        Self {
            engine,
            gate,
            settings,
        }
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn gate(&self) -> &CrawlGate {
        &self.gate
    }

    /// 执行一次爬取
    ///
    /// # 参数
    ///
    /// * `ctx` - 爬取上下文
    /// * `seed_base_url` - 归档站点基础URL
    /// * `allowed_base_domain` - 允许跟随的主机域名
    /// * `subdomain_hint` - 种子页路径末尾的名称
    /// * `target_domain` - 目标根域名
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<String>)` - 去重后的名称，无序
    /// * `Err(CrawlError)` - 缺少范围配置或目标域名没有匹配正则
    pub async fn crawl(
        &self,
        ctx: &CrawlContext,
        seed_base_url: &str,
        allowed_base_domain: &str,
        subdomain_hint: &str,
        target_domain: &str,
    ) -> Result<Vec<String>, CrawlError> {
        let request = CrawlRequest::new(
            seed_base_url,
            allowed_base_domain,
            subdomain_hint,
            target_domain,
        );
        self.crawl_request(ctx, &request)
            .await
            .map(|outcome| outcome.names)
    }

    /// 执行一次爬取并返回会话统计
    ///
    /// 范围配置与匹配正则在获取许可之前检查，失败时不占用许可也不发出请求。
    /// 超时与取消都不是错误，返回已经收集到的名称。
    pub async fn crawl_request(
        &self,
        ctx: &CrawlContext,
        request: &CrawlRequest,
    ) -> Result<CrawlOutcome, CrawlError> {
        let scope = ctx.scope().ok_or(CrawlError::ConfigurationMissing)?;
        let pattern = scope
            .domain_regex(&request.target_domain)
            .ok_or_else(|| CrawlError::PatternUnavailable(request.target_domain.clone()))?;

        let cancel = ctx.cancellation();
        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(CrawlOutcome::cancelled()),
            permit = self.gate.acquire() => permit,
        };

        let span = info_span!(
            "crawl_session",
            session_id = %Uuid::new_v4(),
            source = %request.allowed_base_domain,
            target = %request.target_domain
        );

        let started = Instant::now();
        let outcome = self
            .run_session(request, &pattern, cancel)
            .instrument(span)
            .await;

        counter!("subcrawl_sessions_total").increment(1);
        counter!("subcrawl_names_found_total").increment(outcome.names.len() as u64);
        histogram!("subcrawl_session_duration_seconds").record(started.elapsed().as_secs_f64());

        Ok(outcome)
    }

    async fn run_session(
        &self,
        request: &CrawlRequest,
        pattern: &Regex,
        cancel: &CancellationToken,
    ) -> CrawlOutcome {
        let mut state = SessionState {
            collector: ResultCollector::new(),
            report: CrawlReport::default(),
            visited: HashSet::new(),
            tasks: JoinSet::new(),
            limiter: RequestLimiter::new(
                self.settings.concurrent_requests,
                self.settings.concurrent_requests_per_domain,
            ),
            allowed_domain: request.allowed_base_domain.clone(),
        };

        let start_url = request.start_url(Utc::now().year());
        let seed = match Url::parse(&start_url) {
            Ok(url) => url,
            Err(e) => {
                debug!(url = %start_url, error = %e, "invalid start url");
                return CrawlOutcome::new(state.collector, state.report);
            }
        };
        if !url_within_domain(&seed, &request.allowed_base_domain) {
            debug!(url = %seed, "start url is outside the allowed domain");
            return CrawlOutcome::new(state.collector, state.report);
        }

        debug!(url = %seed, "crawl session started");
        state.visited.insert(seed.to_string());
        self.spawn_visit(&mut state, seed, 0);

        let deadline = tokio::time::sleep(self.settings.session_timeout());
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    state.report.cancelled = true;
                    break;
                }
                _ = &mut deadline => {
                    state.report.timed_out = true;
                    break;
                }
                joined = state.tasks.join_next() => match joined {
                    Some(Ok(visit)) => self.handle_visit(&mut state, pattern, visit),
                    Some(Err(e)) => {
                        state.report.fetch_errors += 1;
                        counter!("subcrawl_fetch_errors_total").increment(1);
                        debug!(error = %e, "page task failed");
                    }
                    None => break,
                },
            }
        }

        // Abort whatever is still in flight
        state.tasks.abort_all();

        debug!(
            pages = state.report.pages_fetched,
            errors = state.report.fetch_errors,
            names = state.collector.len(),
            timed_out = state.report.timed_out,
            cancelled = state.report.cancelled,
            "crawl session finished"
        );
        CrawlOutcome::new(state.collector, state.report)
    }

    fn spawn_visit(&self, state: &mut SessionState, url: Url, depth: usize) {
        let engine = Arc::clone(&self.engine);
        let limiter = state.limiter.clone();
        let allowed = state.allowed_domain.clone();
        let delay = self.next_delay();

        state.tasks.spawn(
            async move {
                let host = url.host_str().unwrap_or_default().to_string();
                let _permit = limiter.acquire(&host).await;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                trace!(url = %url, depth, "fetching page");
                let result = engine
                    .scrape(&ScrapeRequest::new(url.clone()))
                    .await
                    .and_then(|response| {
                        // Redirects may leave the archive; such pages are not mined
                        if !url_within_domain(&response.final_url, &allowed) {
                            return Err(EngineError::OffsiteRedirect(
                                response.final_url.to_string(),
                            ));
                        }
                        Ok(LinkDiscoverer::extract_links(
                            &response.content,
                            &response.final_url,
                        ))
                    });

                PageVisit { url, depth, result }
            }
            .instrument(Span::current()),
        );
    }

    /// 处理页面任务结果
    ///
    /// 页面上的每个链接都用于提取名称；只有允许范围之内的链接会被继续跟随
    fn handle_visit(&self, state: &mut SessionState, pattern: &Regex, visit: PageVisit) {
        let links = match visit.result {
            Ok(links) => links,
            Err(e) => {
                state.report.fetch_errors += 1;
                counter!("subcrawl_fetch_errors_total").increment(1);
                debug!(url = %visit.url, error = %e, "page skipped");
                return;
            }
        };

        state.report.pages_fetched += 1;
        state.report.links_seen += links.len();
        counter!("subcrawl_pages_fetched_total").increment(1);

        for link in links {
            if let Some(name) = extract_name(pattern, link.as_str()) {
                if state.collector.insert(name.as_str()) {
                    trace!(name = %name, "name found");
                }
            }

            if visit.depth < self.settings.max_depth
                && url_within_domain(&link, &state.allowed_domain)
                && state.visited.insert(link.to_string())
            {
                self.spawn_visit(state, link, visit.depth + 1);
            }
        }
    }

    /// 下一次请求前的等待时间
    ///
    /// 开启随机化时在基准值的 0.5 到 1.5 倍之间均匀取值
    fn next_delay(&self) -> Duration {
        let base = self.settings.request_delay();
        if base.is_zero() || !self.settings.randomize_delay {
            return base;
        }
        base.mul_f64(rand::random_range(0.5..=1.5))
    }
}

/// 链接发现器
///
/// 负责从HTML内容中提取链接
pub struct LinkDiscoverer;

impl LinkDiscoverer {
    /// 从HTML内容中提取链接
    ///
    /// 忽略片段、`mailto:` 与 `javascript:` 链接，只保留 http/https，
    /// 去掉片段后按首次出现顺序去重。无法解析的链接直接跳过。
    ///
    /// # 参数
    ///
    /// * `html_content` - HTML内容
    /// * `base_url` - 页面的最终URL
    ///
    /// # 返回值
    ///
    /// 提取到的绝对URL列表
    pub fn extract_links(html_content: &str, base_url: &Url) -> Vec<Url> {
        let document = Html::parse_document(html_content);
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&ANCHOR_SELECTOR) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            // Ignore fragment identifiers, mailto and javascript links
            if href.is_empty()
                || href.starts_with('#')
                || href.starts_with("mailto:")
                || href.starts_with("javascript:")
            {
                continue;
            }

            let mut url = match resolve_url(base_url, href) {
                Ok(url) => url,
                Err(e) => {
                    trace!(href, error = %e, "unresolvable link");
                    continue;
                }
            };
            if url.scheme() != "http" && url.scheme() != "https" {
                continue;
            }
            url.set_fragment(None);
            if seen.insert(url.to_string()) {
                links.push(url);
            }
        }

        links
    }
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
