//! End-to-end forwarding contract tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

mod common;

/// Upstream handler echoing everything the gateway forwarded.
async fn echo_request(req: Request<Body>) -> Json<Value> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "path": req.uri().path(),
        "query": req.uri().query(),
        "method": req.method().as_str(),
        "host": header("host"),
        "authorization": header("authorization"),
        "x_custom": header("x-custom"),
        "connection": header("connection"),
    }))
}

#[tokio::test]
async fn forwards_method_path_query_and_headers() {
    let upstream = Router::new().route("/api/auth/{*rest}", any(echo_request));
    let upstream_addr = common::start_mock_upstream(upstream).await;

    let config = common::gateway_config(vec![common::service("auth", upstream_addr)]);
    let (gateway, _shutdown) = common::spawn_gateway(config).await;

    let res = common::test_client()
        .get(format!(
            "http://{}/api/auth/login?next=%2Fhome&b=2&a=1",
            gateway
        ))
        .header("authorization", "Bearer abc")
        .header("x-custom", "1")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["method"], "GET");
    assert_eq!(body["path"], "/api/auth/login");
    assert_eq!(body["query"], "next=%2Fhome&b=2&a=1");
    assert_eq!(body["authorization"], "Bearer abc");
    assert_eq!(body["x_custom"], "1");
    // The upstream sees its own authority, never the client's Host.
    assert_eq!(body["host"], upstream_addr.to_string());
}

#[tokio::test]
async fn relays_post_body_and_status() {
    let upstream = Router::new().route(
        "/api/auth/register",
        post(|body: Bytes| async move { (StatusCode::CREATED, body) }),
    );
    let upstream_addr = common::start_mock_upstream(upstream).await;

    let config = common::gateway_config(vec![common::service("auth", upstream_addr)]);
    let (gateway, _shutdown) = common::spawn_gateway(config).await;

    let payload = br#"{"user":"amira","password":"s3cret"}"#.to_vec();
    let res = common::test_client()
        .post(format!("http://{}/api/auth/register", gateway))
        .body(payload.clone())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 201);
    assert_eq!(res.bytes().await.unwrap().as_ref(), payload.as_slice());
}

#[tokio::test]
async fn rewrites_upstream_prefix_per_service() {
    let upstream = Router::new().route("/api/{*rest}", any(echo_request));
    let upstream_addr = common::start_mock_upstream(upstream).await;

    let mut svc = common::service("content", upstream_addr);
    svc.upstream_prefix = Some("/api".to_string());
    let config = common::gateway_config(vec![svc]);
    let (gateway, _shutdown) = common::spawn_gateway(config).await;

    let res = common::test_client()
        .get(format!("http://{}/api/content/posts/7", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    // The "content" alias is stripped; the upstream sees /api/posts/7.
    assert_eq!(body["path"], "/api/posts/7");
}

#[tokio::test]
async fn relays_redirect_without_following() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let upstream = Router::new().route(
        "/api/auth/login",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Response::builder()
                    .status(StatusCode::FOUND)
                    .header("location", "http://example.com/elsewhere")
                    .body(Body::empty())
                    .unwrap()
            }
        }),
    );
    let upstream_addr = common::start_mock_upstream(upstream).await;

    let config = common::gateway_config(vec![common::service("auth", upstream_addr)]);
    let (gateway, _shutdown) = common::spawn_gateway(config).await;

    let res = common::test_client()
        .get(format!("http://{}/api/auth/login", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 302);
    assert_eq!(
        res.headers().get("location").unwrap(),
        "http://example.com/elsewhere"
    );
    // Exactly one outbound call: the gateway never chased the redirect.
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn relays_upstream_errors_untranslated() {
    let upstream = Router::new().route(
        "/api/auth/login",
        get(|| async {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"}))).into_response()
        }),
    );
    let upstream_addr = common::start_mock_upstream(upstream).await;

    let config = common::gateway_config(vec![common::service("auth", upstream_addr)]);
    let (gateway, _shutdown) = common::spawn_gateway(config).await;

    let res = common::test_client()
        .get(format!("http://{}/api/auth/login", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "boom");
}

#[tokio::test]
async fn unknown_alias_is_404() {
    let upstream = Router::new().route("/api/auth/{*rest}", any(echo_request));
    let upstream_addr = common::start_mock_upstream(upstream).await;

    let config = common::gateway_config(vec![common::service("auth", upstream_addr)]);
    let (gateway, _shutdown) = common::spawn_gateway(config).await;

    let res = common::test_client()
        .get(format!("http://{}/api/billing/invoices", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Unknown service");
}

#[tokio::test]
async fn unreachable_upstream_is_503() {
    let dead_addr = common::unused_addr().await;
    let config = common::gateway_config(vec![common::service("auth", dead_addr)]);
    let (gateway, _shutdown) = common::spawn_gateway(config).await;

    let res = common::test_client()
        .get(format!("http://{}/api/auth/login", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Service unavailable");
}

#[tokio::test]
async fn forward_timeout_is_bounded() {
    let hung_addr = common::start_black_hole().await;
    let mut config = common::gateway_config(vec![common::service("auth", hung_addr)]);
    config.timeouts.forward_secs = 1;
    config.health_check.timeout_secs = 1;
    let (gateway, _shutdown) = common::spawn_gateway(config).await;

    let start = Instant::now();
    let res = common::test_client()
        .get(format!("http://{}/api/auth/login", gateway))
        .send()
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(res.status(), 503);
    assert!(
        elapsed >= Duration::from_millis(900),
        "failed earlier than the timeout: {:?}",
        elapsed
    );
    assert!(
        elapsed < Duration::from_millis(2500),
        "failed later than the timeout: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn gateway_health_is_local_only() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let upstream = Router::new().route(
        "/{*rest}",
        any(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        }),
    );
    let upstream_addr = common::start_mock_upstream(upstream).await;

    let config = common::gateway_config(vec![common::service("auth", upstream_addr)]);
    let (gateway, _shutdown) = common::spawn_gateway(config).await;

    let res = common::test_client()
        .get(format!("http://{}/health", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "naebak-gateway");
    assert!(body["services"]["auth"]
        .as_str()
        .unwrap()
        .contains(&upstream_addr.to_string()));
    assert!(body["timestamp"].is_string());
    // Liveness never touches upstreams.
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn root_lists_capabilities() {
    let upstream = Router::new().route("/api/auth/{*rest}", any(echo_request));
    let upstream_addr = common::start_mock_upstream(upstream).await;

    let config = common::gateway_config(vec![common::service("auth", upstream_addr)]);
    let (gateway, _shutdown) = common::spawn_gateway(config).await;

    let res = common::test_client()
        .get(format!("http://{}/", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert!(body["endpoints"]["/health"].is_string());
    assert!(body["endpoints"]["/api/services"].is_string());
    assert!(body["endpoints"]["/api/auth/*"]
        .as_str()
        .unwrap()
        .contains("auth"));
}
