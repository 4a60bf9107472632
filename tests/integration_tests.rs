//! End-to-end tests against a real listener.
//!
//! Each test binds an `EchoServer` on an ephemeral loopback port and talks
//! to it over HTTP/1.1 with `reqwest`, the same way Envoy would.
//!
//! Run with: `cargo test --test integration_tests`
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use echo_upstream::{AppResult, Config, EchoServer, MissingIdentityPolicy};

const GREETING: &str = "upstream.service: Hello from behind Envoy!\n----\n";
const TRAILER: &str = "\n----\n";

/// Test fixture that owns a running server and shuts it down on drop.
struct TestFixture {
    base_url: String,
    client: Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<AppResult<()>>>,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_policy(MissingIdentityPolicy::Reject).await
    }

    async fn with_policy(policy: MissingIdentityPolicy) -> Self {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            missing_identity_policy: policy,
            ..Config::default()
        };

        let server = EchoServer::bind(config)
            .await
            .expect("Failed to bind echo server");
        let base_url = format!("http://{}", server.local_addr());

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve(async move {
            let _ = rx.await;
        }));

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, headers: &[(&str, &str)]) -> (StatusCode, String) {
        let mut request = self.client.get(self.url(path));
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await.expect("Request failed");
        let status = response.status();
        let body = response.text().await.expect("Failed to read body");
        (status, body)
    }

    /// Stop the server and wait until the listener is released.
    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle
                .await
                .expect("Server task panicked")
                .expect("Server returned an error");
        }
    }
}

impl Drop for TestFixture {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Return the text between the two `----` markers.
fn header_block(body: &str) -> &str {
    body.strip_prefix(GREETING)
        .and_then(|rest| rest.strip_suffix(TRAILER))
        .unwrap_or_else(|| panic!("Unexpected body layout: {body:?}"))
}

// ============================================================================
// /service
// ============================================================================

#[tokio::test]
async fn test_service_greets_forwarded_identity() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .get("/service", &[("x-current-user", "bob")])
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "upstream.service: Hello bob from behind Envoy!");
}

#[tokio::test]
async fn test_service_header_name_is_case_insensitive() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .get("/service", &[("X-Current-User", "alice")])
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "upstream.service: Hello alice from behind Envoy!");
}

#[tokio::test]
async fn test_service_content_type_is_plain_text() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .client
        .get(fixture.url("/service"))
        .header("x-current-user", "alice")
        .send()
        .await
        .expect("Request failed");

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .expect("content-type missing");
    assert!(content_type.starts_with("text/plain"));
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_service_missing_identity_is_rejected() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .client
        .get(fixture.url("/service"))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "missing_identity");
    assert!(
        body["message"]
            .as_str()
            .expect("message missing")
            .contains("x-current-user")
    );
}

#[tokio::test]
async fn test_service_missing_identity_with_empty_policy() {
    let fixture = TestFixture::with_policy(MissingIdentityPolicy::Empty).await;

    let (status, body) = fixture.get("/service", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "upstream.service: Hello  from behind Envoy!");
}

#[tokio::test]
async fn test_service_empty_identity_is_echoed() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/service", &[("x-current-user", "")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "upstream.service: Hello  from behind Envoy!");
}

#[tokio::test]
async fn test_service_duplicate_identity_uses_last_value() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .get(
            "/service",
            &[("x-current-user", "alice"), ("x-current-user", "mallory")],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "upstream.service: Hello mallory from behind Envoy!");
}

// ============================================================================
// /
// ============================================================================

#[tokio::test]
async fn test_root_lists_every_header_once() {
    let fixture = TestFixture::new().await;
    let sent = [
        ("x-current-user", "alice"),
        ("x-envoy-expected-rq-timeout-ms", "15000"),
        ("x-forwarded-proto", "http"),
    ];

    let (status, body) = fixture.get("/", &sent).await;

    assert_eq!(status, StatusCode::OK);
    let block = header_block(&body);
    for (name, value) in sent {
        let line = format!("{name}: {value}\r\n");
        assert_eq!(block.matches(&line).count(), 1, "{line:?} in {block:?}");
    }
    // The transport always adds the host header
    let host = fixture.base_url.trim_start_matches("http://");
    assert!(block.contains(&format!("host: {host}\r\n")));
    assert!(block.ends_with("\r\n\r\n"));
}

#[tokio::test]
async fn test_root_keeps_arrival_order() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture
        .get("/", &[("x-first", "1"), ("x-second", "2"), ("x-third", "3")])
        .await;

    let block = header_block(&body);
    let first = block.find("x-first: 1").expect("x-first missing");
    let second = block.find("x-second: 2").expect("x-second missing");
    let third = block.find("x-third: 3").expect("x-third missing");
    assert!(first < second && second < third);
}

#[tokio::test]
async fn test_root_does_not_require_identity() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!header_block(&body).contains("x-current-user"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let fixture = TestFixture::new().await;

    let (status, _) = fixture.get("/admin", &[]).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .expect("Health request failed");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
    assert!(body.get("version").is_some());
    assert!(body.get("timestamp").is_some());
}

// ============================================================================
// Determinism & concurrency
// ============================================================================

#[tokio::test]
async fn test_repeated_requests_are_byte_identical() {
    let fixture = TestFixture::new().await;
    let headers = [("x-current-user", "carol"), ("x-request-id", "fixed-id")];

    for path in ["/", "/service"] {
        let first = fixture.get(path, &headers).await;
        let second = fixture.get(path, &headers).await;
        assert_eq!(first, second, "{path} responses differ");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_do_not_mix() {
    let fixture = std::sync::Arc::new(TestFixture::new().await);

    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let fixture = fixture.clone();
            tokio::spawn(async move {
                let user = format!("user-{i}");
                let path = if i % 2 == 0 { "/" } else { "/service" };
                let (status, body) = fixture
                    .get(path, &[("x-current-user", user.as_str())])
                    .await;
                (i, user, path, status, body)
            })
        })
        .collect();

    for task in tasks {
        let (i, user, path, status, body) = task.await.expect("Task panicked");
        assert_eq!(status, StatusCode::OK);
        if path == "/" {
            let block = header_block(&body);
            assert_eq!(block.matches("x-current-user: ").count(), 1);
            assert!(block.contains(&format!("x-current-user: {user}\r\n")));
        } else {
            assert_eq!(
                body,
                format!("upstream.service: Hello user-{i} from behind Envoy!")
            );
        }
    }
}

#[tokio::test]
async fn test_shutdown_releases_listener() {
    let fixture = TestFixture::new().await;
    let port = fixture
        .base_url
        .rsplit(':')
        .next()
        .and_then(|p| p.parse::<u16>().ok())
        .expect("port missing");

    fixture.stop().await;

    let config = Config {
        host: "127.0.0.1".to_string(),
        port,
        ..Config::default()
    };
    assert!(EchoServer::bind(config).await.is_ok());
}
