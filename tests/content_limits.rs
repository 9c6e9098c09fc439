mod common;

use common::{direct, html, page, serve_without_content_length};
use url_summary::{Summarizer, SummaryError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

fn large_page() -> String {
    let filler = "<p>lorem ipsum dolor sit amet</p>".repeat(200);
    page(&format!("<title>Large</title>{filler}"))
}

#[tokio::test]
async fn test_declared_length_over_limit_is_rejected() {
    let server = MockServer::start().await;
    let body = large_page();
    let declared = body.len() as u64;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(html(body))
        .mount(&server)
        .await;

    let url = format!("{}/large", server.uri());
    let result = Summarizer::new()
        .summarize(&url, direct().with_content_length_limit(1024))
        .await;

    match result {
        Err(SummaryError::ContentLengthExceeded { limit, actual }) => {
            assert_eq!(limit, 1024);
            assert_eq!(actual, declared);
        }
        other => panic!("Expected ContentLengthExceeded, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_body_within_limit_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/small"))
        .respond_with(html(page("<title>Small</title>")))
        .mount(&server)
        .await;

    let url = format!("{}/small", server.uri());
    let summary = Summarizer::new()
        .summarize(
            &url,
            direct()
                .with_content_length_limit(64 * 1024)
                .with_content_length_required(true),
        )
        .await
        .unwrap();

    assert_eq!(summary.title.as_deref(), Some("Small"));
}

#[tokio::test]
async fn test_missing_length_is_rejected_when_required() {
    let base = serve_without_content_length(page("<title>Chunked</title>")).await;
    let url = format!("{base}/undeclared");

    let result = Summarizer::new()
        .summarize(&url, direct().with_content_length_required(true))
        .await;

    match result {
        Err(SummaryError::ContentLengthRequired(failed)) => assert_eq!(failed, url),
        other => panic!("Expected ContentLengthRequired, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_length_is_accepted_by_default() {
    let base = serve_without_content_length(page("<title>Chunked</title>")).await;
    let url = format!("{base}/undeclared");

    let summary = Summarizer::new().summarize(&url, direct()).await.unwrap();

    assert_eq!(summary.title.as_deref(), Some("Chunked"));
}

#[tokio::test]
async fn test_undeclared_body_over_limit_is_rejected_while_streaming() {
    let base = serve_without_content_length(large_page()).await;
    let url = format!("{base}/undeclared");

    let result = Summarizer::new()
        .summarize(&url, direct().with_content_length_limit(1024))
        .await;

    match result {
        Err(SummaryError::ContentLengthExceeded { limit, actual }) => {
            assert_eq!(limit, 1024);
            assert!(actual > 1024);
        }
        other => panic!("Expected ContentLengthExceeded, got: {:?}", other),
    }
}
