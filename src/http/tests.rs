//! Tests for the HTTP client module

use super::*;
use crate::auth::{Credential, CredentialStore};
use crate::error::Error;
use crate::types::BackoffType;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str, token: Option<&str>) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(base_url)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .no_rate_limit()
        .build();
    let store = match token {
        Some(t) => CredentialStore::with_credential(Credential::new(t)),
        None => CredentialStore::new(),
    };
    HttpClient::new(config, store).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 2);
    assert!(config.rate_limit.is_some());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://canvas.example.edu/api/v1")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, "https://canvas.example.edu/api/v1");
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_keeps_repeated_keys() {
    let config = RequestConfig::new()
        .query("include[]", "submission")
        .query("include[]", "overrides")
        .query("per_page", "100")
        .header("X-Request-Id", "abc123")
        .timeout(Duration::from_secs(10))
        .retries(0);

    assert_eq!(
        config.query,
        vec![
            ("include[]".to_string(), "submission".to_string()),
            ("include[]".to_string(), "overrides".to_string()),
            ("per_page".to_string(), "100".to_string()),
        ]
    );
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.max_retries, Some(0));
}

#[tokio::test]
async fn test_get_sends_bearer_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/self"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7, "name": "Ada"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&format!("{}/api/v1", mock_server.uri()), Some("tok-123"));
    let user: serde_json::Value = client.get_json("users/self").await.unwrap();

    assert_eq!(user["name"], "Ada");
}

#[tokio::test]
async fn test_credential_read_per_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/courses"))
        .and(header("Authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Some("first"));
    client.credentials().set(Credential::new("second")).await;

    let response = client.get("courses").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_missing_credential_fails_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), None);
    let err = client.get("courses").await.unwrap_err();

    assert!(matches!(err, Error::MissingCredential));
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "errors": [{"message": "Invalid access token."}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Some("expired"));
    let err = client.get("courses").await.unwrap_err();

    assert!(matches!(err, Error::Unauthorized { status: 401 }));
    assert!(err.is_authorization());
}

#[tokio::test]
async fn test_query_params_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/planner/items"))
        .and(query_param("start_date", "2024-03-09"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Some("tok"));
    let response = client
        .get_with_config(
            "/planner/items",
            RequestConfig::new()
                .query("start_date", "2024-03-09")
                .query("per_page", "100"),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_put_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/planner/overrides/55"))
        .and(body_json(serde_json::json!({"marked_complete": "true"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 55, "marked_complete": true
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Some("tok"));
    let response = client
        .put(
            "planner/overrides/55",
            serde_json::json!({"marked_complete": "true"}),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_404_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/courses/9/assignments"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Some("tok"));
    let err = client.get("courses/9/assignments").await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, ref body } if body == "Not found"));
}

#[tokio::test]
async fn test_retry_on_500() {
    let mock_server = MockServer::start().await;

    // First two calls return 500, third succeeds
    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .max_retries(3)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .no_rate_limit()
        .build();
    let store = CredentialStore::with_credential(Credential::new("tok"));
    let client = HttpClient::new(config, store).unwrap();

    let response = client.get("courses").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_rate_limit_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_string("403 Forbidden (Rate Limit Exceeded)"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Some("tok"));
    let response = client.get("courses").await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_server_error_after_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Some("tok"));
    let err = client.get("courses").await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[test]
fn test_build_url() {
    let client = test_client("https://canvas.example.edu/api/v1/", Some("tok"));

    assert_eq!(
        client.build_url("courses").unwrap(),
        "https://canvas.example.edu/api/v1/courses"
    );
    assert_eq!(
        client.build_url("/users/self").unwrap(),
        "https://canvas.example.edu/api/v1/users/self"
    );
    assert_eq!(
        client
            .build_url("https://canvas.example.edu/api/v1/courses?page=2")
            .unwrap(),
        "https://canvas.example.edu/api/v1/courses?page=2"
    );
    assert!(matches!(
        client.build_url("https://other.example.com/x"),
        Err(Error::ForeignOrigin { .. })
    ));
    assert!(matches!(
        client.build_url("http://canvas.example.edu/api/v1/courses"),
        Err(Error::ForeignOrigin { .. })
    ));
}

#[test]
fn test_strip_base() {
    let client = test_client("https://canvas.example.edu/api/v1", Some("tok"));

    assert_eq!(
        client
            .strip_base("https://canvas.example.edu/api/v1/planner/items?page=2&per_page=10")
            .unwrap(),
        "planner/items?page=2&per_page=10"
    );
    assert_eq!(client.strip_base("courses?page=3").unwrap(), "courses?page=3");
    assert_eq!(
        client
            .strip_base("https://canvas.example.edu/api/v10/courses?page=2")
            .unwrap(),
        "https://canvas.example.edu/api/v10/courses?page=2"
    );
    assert!(matches!(
        client.strip_base("https://elsewhere.example.com/api/v1/courses"),
        Err(Error::ForeignOrigin { .. })
    ));
}

#[tokio::test]
async fn test_foreign_origin_never_sees_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client("https://canvas.example.edu/api/v1", Some("tok"));
    let err = client
        .get(&format!("{}/courses", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ForeignOrigin { .. }));
}

#[tokio::test]
async fn test_rate_limited_on_last_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Some("tok"));
    let err = client
        .get_with_config("courses", RequestConfig::new().retries(0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after_seconds: 7
        }
    ));
}

#[test]
fn test_calculate_backoff() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .no_rate_limit()
        .build();
    let client = HttpClient::new(config, CredentialStore::new()).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(500));
}

#[test]
fn test_http_client_debug_hides_credential() {
    let client = test_client("https://canvas.example.edu/api/v1", Some("super-secret"));
    let debug = format!("{client:?}");

    assert!(debug.contains("HttpClient"));
    assert!(!debug.contains("super-secret"));
}

#[test]
fn test_default_client_has_rate_limiter() {
    let client = HttpClient::new(HttpClientConfig::default(), CredentialStore::new()).unwrap();
    assert!(client.has_rate_limiter());
}
