//! CORS allow-list and server lifecycle

mod common;

use std::sync::Arc;

use common::{spawn, spawn_with, test_config, upright_body};
use posturepal_api_http::{HttpServer, HttpServerConfig};
use posturepal_core::port::mocks::FixedModelAdapter;
use reqwest::{Method, StatusCode};

async fn preflight(base_url: &str, origin: &str) -> reqwest::Response {
    reqwest::Client::new()
        .request(Method::OPTIONS, format!("{}/predict", base_url))
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type,x-client-build")
        .send()
        .await
        .unwrap()
}

fn header<'a>(response: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_preflight_from_allowed_origin() {
    let server = spawn(Arc::new(FixedModelAdapter::good_posture())).await;

    let response = preflight(&server.base_url, "http://localhost:5173").await;

    assert!(response.status().is_success());
    assert_eq!(
        header(&response, "access-control-allow-origin"),
        Some("http://localhost:5173")
    );
    assert_eq!(
        header(&response, "access-control-allow-credentials"),
        Some("true")
    );
    assert_eq!(
        header(&response, "access-control-allow-methods"),
        Some("POST")
    );
    assert_eq!(
        header(&response, "access-control-allow-headers"),
        Some("content-type,x-client-build")
    );

    server.handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_preflight_from_unlisted_origin() {
    let server = spawn(Arc::new(FixedModelAdapter::good_posture())).await;

    let response = preflight(&server.base_url, "http://evil.example").await;

    assert_eq!(header(&response, "access-control-allow-origin"), None);

    server.handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_simple_request_carries_cors_headers() {
    let server = spawn(Arc::new(FixedModelAdapter::good_posture())).await;

    let response = reqwest::Client::new()
        .post(format!("{}/predict", server.base_url))
        .header("origin", "http://127.0.0.1:3000")
        .json(&upright_body())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "access-control-allow-origin"),
        Some("http://127.0.0.1:3000")
    );

    server.handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_configured_origin_list_replaces_defaults() {
    let config = HttpServerConfig {
        allowed_origins: vec!["https://posture.example".to_string()],
        ..test_config()
    };
    let server = spawn_with(config, Arc::new(FixedModelAdapter::good_posture())).await;

    let allowed = preflight(&server.base_url, "https://posture.example").await;
    assert_eq!(
        header(&allowed, "access-control-allow-origin"),
        Some("https://posture.example")
    );

    let default_origin = preflight(&server.base_url, "http://localhost:5173").await;
    assert_eq!(header(&default_origin, "access-control-allow-origin"), None);

    server.handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_wildcard_origin_fails_startup() {
    let config = HttpServerConfig {
        allowed_origins: vec!["*".to_string()],
        ..test_config()
    };

    let result = HttpServer::new(config, Arc::new(FixedModelAdapter::good_posture()))
        .start()
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_stop_releases_port() {
    let server = spawn(Arc::new(FixedModelAdapter::good_posture())).await;
    let addr = server.handle.local_addr();

    server.handle.stop().await.unwrap();

    let result = reqwest::get(format!("http://{}/", addr)).await;
    assert!(result.is_err(), "server should no longer accept connections");
}

#[tokio::test]
async fn test_bind_conflict_is_reported() {
    let server = spawn(Arc::new(FixedModelAdapter::good_posture())).await;
    let port = server.handle.local_addr().port();

    let config = HttpServerConfig {
        port,
        ..test_config()
    };
    let result = HttpServer::new(config, Arc::new(FixedModelAdapter::good_posture()))
        .start()
        .await;

    assert!(result.is_err());

    server.handle.stop().await.unwrap();
}
