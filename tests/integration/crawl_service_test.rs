// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Datelike, Utc};
use std::sync::Arc;
use subcrawl::config::scope::ScopeConfig;
use subcrawl::config::settings::CrawlSettings;
use subcrawl::domain::models::context::CrawlContext;
use subcrawl::domain::models::crawl::CrawlRequest;
use subcrawl::domain::services::crawl_service::CrawlService;
use subcrawl::engines::crawl_gate::CrawlGate;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AGENT: &str = "subcrawl-integration/1.0";

fn settings() -> CrawlSettings {
    CrawlSettings {
        request_delay_ms: 10,
        randomize_delay: true,
        session_timeout_secs: 10,
        request_timeout_secs: 5,
        user_agent: AGENT.to_string(),
        ..Default::default()
    }
}

fn context() -> CrawlContext {
    CrawlContext::new(Arc::new(ScopeConfig::new(["example.com"]).unwrap()))
}

fn html(hrefs: &[String]) -> String {
    let body: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">snapshot</a>"#, href))
        .collect();
    format!("<html><body>{}</body></html>", body)
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("user-agent", AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_archive_server_end_to_end() {
    let server = MockServer::start().await;
    let year = Utc::now().year();

    let www = format!("/web/{}/http://www.example.com/", year);
    let encoded = format!("/web/{}/https%3A%2F%2Fapi.example.com/", year);
    let deep = format!("/web/{}/http://deep.example.com/", year);

    mount_page(
        &server,
        &format!("/web/{}/example.com", year),
        html(&[
            www.clone(),
            encoded,
            "https://mail.example.com/".to_string(),
            "mailto:admin@example.com".to_string(),
        ]),
    )
    .await;
    mount_page(&server, &www, html(&[deep])).await;

    let service = CrawlService::new(CrawlGate::default(), settings()).unwrap();
    let request = CrawlRequest::new(
        format!("{}/web", server.uri()),
        "127.0.0.1",
        "example.com",
        "example.com",
    );

    let outcome = service.crawl_request(&context(), &request).await.unwrap();

    let mut names = outcome.names;
    names.sort();
    assert_eq!(
        names,
        vec![
            "api.example.com",
            "deep.example.com",
            "mail.example.com",
            "www.example.com"
        ]
    );
    assert_eq!(outcome.report.pages_fetched, 2);
    assert!(outcome.report.fetch_errors >= 1);
    assert!(!outcome.report.timed_out);
    assert_eq!(service.gate().available(), service.gate().capacity());
}

#[tokio::test]
async fn test_crawl_ignores_redirect_off_the_archive() {
    let archive = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    let year = Utc::now().year();
    let landing = format!("http://localhost:{}/landing", elsewhere.address().port());

    Mock::given(method("GET"))
        .and(path(format!("/web/{}/example.com", year)))
        .respond_with(ResponseTemplate::new(302).insert_header("location", landing.as_str()))
        .mount(&archive)
        .await;
    mount_page(
        &elsewhere,
        "/landing",
        html(&["http://leaked.example.com/".to_string()]),
    )
    .await;

    let service = CrawlService::new(CrawlGate::default(), settings()).unwrap();
    let request = CrawlRequest::new(
        format!("{}/web", archive.uri()),
        "127.0.0.1",
        "example.com",
        "example.com",
    );

    let outcome = service.crawl_request(&context(), &request).await.unwrap();

    assert!(outcome.names.is_empty());
    assert_eq!(outcome.report.pages_fetched, 0);
    assert_eq!(outcome.report.fetch_errors, 1);
}

#[tokio::test]
async fn test_crawl_non_html_seed_returns_empty() {
    let server = MockServer::start().await;
    let year = Utc::now().year();

    Mock::given(method("GET"))
        .and(path(format!("/web/{}/example.com", year)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"host":"www.example.com"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = CrawlService::new(CrawlGate::default(), settings()).unwrap();

    let names = service
        .crawl(
            &context(),
            &format!("{}/web", server.uri()),
            "127.0.0.1",
            "example.com",
            "example.com",
        )
        .await
        .unwrap();

    assert!(names.is_empty());
}
