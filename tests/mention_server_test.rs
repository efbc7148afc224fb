//! Integration tests for the mention lookup server.

use std::net::SocketAddr;
use std::sync::Arc;

use chatloom::names::{NameIndex, LOOKUP_LIMIT};
use chatloom::server::{start_mention_server_on, HealthResponse};
use tokio::task::JoinHandle;

async fn start(count: usize) -> (JoinHandle<()>, String) {
    let names = Arc::new(NameIndex::synthetic(count));
    // Bind to port 0 to get a random available port
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let (handle, addr) = start_mention_server_on(addr, names)
        .await
        .expect("Failed to start mention server");
    (handle, format!("http://{}", addr))
}

async fn lookup(base: &str, path: &str) -> Vec<String> {
    let response = reqwest::get(format!("{}{}", base, path))
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    response.json().await.expect("Body was not a JSON array")
}

#[tokio::test]
async fn test_mentions_caps_at_ten() {
    let (handle, base) = start(10_000).await;

    let names = lookup(&base, "/mentions?q=user").await;

    assert_eq!(names.len(), LOOKUP_LIMIT);
    assert_eq!(names[0], "User1");
    assert_eq!(names[9], "User10");
    handle.abort();
}

#[tokio::test]
async fn test_mentions_case_insensitive_in_index_order() {
    let (handle, base) = start(10_000).await;

    let names = lookup(&base, "/mentions?q=SER999").await;

    assert_eq!(names, vec!["User999", "User9990", "User9991", "User9992", "User9993",
        "User9994", "User9995", "User9996", "User9997", "User9998"]);
    handle.abort();
}

#[tokio::test]
async fn test_mentions_empty_or_missing_query() {
    let (handle, base) = start(100).await;

    assert!(lookup(&base, "/mentions").await.is_empty());
    assert!(lookup(&base, "/mentions?q=").await.is_empty());
    assert!(lookup(&base, "/mentions?q=nobody").await.is_empty());
    handle.abort();
}

#[tokio::test]
async fn test_health_reports_name_count() {
    let (handle, base) = start(1234).await;

    let health: HealthResponse = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.names, 1234);
    handle.abort();
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (handle, base) = start(100).await;

    let response = reqwest::Client::new()
        .get(format!("{}/mentions?q=user", base))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    let allow = response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok());
    assert_eq!(allow, Some("*"));
    handle.abort();
}
