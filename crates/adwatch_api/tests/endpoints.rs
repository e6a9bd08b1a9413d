use std::time::Duration;

use adwatch_api::{ErrorKind, MonitorApi, MonitorBackend, RetryPolicy};
use adwatch_core::{Catalog, CategoryRecord, KeywordEntry};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_policy() -> RetryPolicy {
    RetryPolicy {
        base_delay: Duration::from_millis(2),
        ..RetryPolicy::default()
    }
}

fn api(server: &MockServer) -> MonitorApi {
    MonitorApi::new(server.uri(), quick_policy()).expect("client")
}

fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(
        "shoes".to_string(),
        CategoryRecord {
            enabled: true,
            keywords: vec![KeywordEntry {
                text: "nike".to_string(),
                enabled: true,
                added_at: Some("2026-01-01T00:00:00Z".to_string()),
            }],
            created_at: None,
        },
    );
    catalog
}

#[tokio::test]
async fn fetch_catalog_unwraps_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/keywords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "keywords": {
                "shoes": {
                    "enabled": true,
                    "keywords": [
                        {"text": "nike", "enabled": true, "added_at": "2026-01-01T00:00:00Z"}
                    ]
                }
            }
        })))
        .mount(&server)
        .await;

    let catalog = api(&server).fetch_catalog().await.expect("catalog");
    assert_eq!(catalog, sample_catalog());
}

#[tokio::test]
async fn application_errors_surface_without_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/keywords"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"error": "keywords file unreadable"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = api(&server).fetch_catalog().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Application);
    assert_eq!(err.message, "keywords file unreadable");
}

#[tokio::test]
async fn save_catalog_posts_the_full_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/resources/keywords.json"))
        .and(body_json(serde_json::json!({
            "shoes": {
                "enabled": true,
                "keywords": [
                    {"text": "nike", "enabled": true, "added_at": "2026-01-01T00:00:00Z"}
                ]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    api(&server)
        .save_catalog(&sample_catalog())
        .await
        .expect("save");
}

#[tokio::test]
async fn fetch_results_maps_records_and_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {
                    "id": "1",
                    "landing_page": "https://shoes.example.com",
                    "keyword_records": [
                        {"keyword": "nike", "market": "in", "title": "Nike"}
                    ]
                }
            ],
            "last_updated": "2026-01-01T00:00:00Z"
        })))
        .mount(&server)
        .await;

    let snapshot = api(&server).fetch_results().await.expect("results");
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(snapshot.results[0].landing_page, "https://shoes.example.com");
    assert_eq!(snapshot.results[0].keyword_records[0].keyword, "nike");
    // Fields absent on the wire default to empty.
    assert_eq!(snapshot.results[0].keyword_records[0].description, "");
    assert_eq!(
        snapshot.last_updated.as_deref(),
        Some("2026-01-01T00:00:00Z")
    );
}

#[tokio::test]
async fn start_crawl_sends_the_keyword_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl"))
        .and(body_json(serde_json::json!(["nike", "puma"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "crawl finished",
            "new_results": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = api(&server)
        .start_crawl(&["nike".to_string(), "puma".to_string()])
        .await
        .expect("crawl");
    assert_eq!(outcome.message.as_deref(), Some("crawl finished"));
    assert_eq!(outcome.new_results, Some(2));
}

#[tokio::test]
async fn delete_record_posts_the_landing_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/delete_record"))
        .and(body_json(
            serde_json::json!({"landing_page": "https://shoes.example.com"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    api(&server)
        .delete_record("https://shoes.example.com")
        .await
        .expect("delete");
}

#[tokio::test]
async fn expand_keywords_parses_the_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/expand_keywords"))
        .and(body_json(serde_json::json!({"category": "shoes"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!(["nike air", "nike run"])),
        )
        .mount(&server)
        .await;

    let suggestions = api(&server).expand_keywords("shoes").await.expect("expand");
    assert_eq!(
        suggestions,
        vec!["nike air".to_string(), "nike run".to_string()]
    );
}

#[tokio::test]
async fn expand_keywords_maps_error_objects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/expand_keywords"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "Missing category"})),
        )
        .mount(&server)
        .await;

    let err = api(&server).expand_keywords("").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Application);
    assert_eq!(err.message, "Missing category");
}

#[tokio::test]
async fn proxy_requests_pass_the_target_url_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proxy"))
        .and(query_param("url", "https://ads.example.com/landing?x=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>landing</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = api(&server)
        .proxy("https://ads.example.com/landing?x=1")
        .await
        .expect("proxy");
    assert_eq!(body, "<html>landing</html>");
}
