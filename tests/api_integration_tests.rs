//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;
use url_cache::{
    api::create_router, AppState, CacheOptions, MaxAge, NormalizeProfile, ProfileName, UrlCache,
};

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::new(UrlCache::with_defaults()))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Percent-encodes a URL for use as the `url` query parameter
fn url_param(raw: &str) -> String {
    raw.replace('%', "%25")
        .replace(':', "%3A")
        .replace('/', "%2F")
        .replace('?', "%3F")
        .replace('#', "%23")
        .replace('&', "%26")
        .replace('=', "%3D")
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn put_value(app: &Router, url: &str, value: &str) -> Response {
    let body = serde_json::json!({ "url": url, "value": value }).to_string();
    send(app, "PUT", "/set", Some(&body)).await
}

async fn get_value(app: &Router, url: &str) -> Response {
    send(app, "GET", &format!("/get?url={}", url_param(url)), None).await
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_returns_canonical_key() {
    let app = create_test_app();

    let response = put_value(&app, "http://www.domain.com:80/path/index.html#top", "v").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "http://domain.com/path/");
    assert!(json["message"].as_str().unwrap().contains("successfully"));
}

#[tokio::test]
async fn test_set_endpoint_with_max_age() {
    let app = create_test_app();
    let body = r#"{"url":"http://domain.com/","value":"v","max_age_ms":60000}"#;

    let response = send(&app, "PUT", "/set", Some(body)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_equivalent_urls() {
    let app = create_test_app();
    put_value(&app, "http://domain.com/path/to/index.html?#", "some value").await;

    let response = get_value(&app, "http://domain.com/path/to/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], "some value");
    assert_eq!(json["key"], "http://domain.com/path/to/");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = get_value(&app, "http://domain.com/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("http://domain.com/missing"));
}

#[tokio::test]
async fn test_careful_profile_server() {
    let options = CacheOptions::default().with_profile(ProfileName::Careful);
    let app = create_router(AppState::new(UrlCache::new(options)));

    put_value(&app, "http://domain.com/path/to/index.html", "v").await;

    let response = get_value(&app, "http://domain.com/path/to/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_custom_default_port_profile() {
    let profile = NormalizeProfile::default().with_default_port("protocol", 1234);
    let options = CacheOptions::default().with_common_profile(profile);
    let app = create_router(AppState::new(UrlCache::new(options)));

    put_value(&app, "protocol://domain.com:1234/path/", "v").await;

    let response = get_value(&app, "protocol://domain.com/path/").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// == HAS / DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint() {
    let app = create_test_app();
    put_value(&app, "http://domain.com/a", "v").await;

    let response = send(&app, "DELETE", &format!("/del?url={}", url_param("http://domain.com/a")), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", &format!("/has?url={}", url_param("http://domain.com/a")), None).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["present"], false);
}

#[tokio::test]
async fn test_delete_missing_is_not_an_error() {
    let app = create_test_app();

    let response = send(&app, "DELETE", &format!("/del?url={}", url_param("http://domain.com/x")), None).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_clear_endpoint() {
    let app = create_test_app();
    put_value(&app, "http://domain.com/a", "1").await;
    put_value(&app, "http://domain.com/b", "2").await;

    let response = send(&app, "DELETE", "/clear", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/stats", None).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["total_entries"], 0);
}

// == CLEAN Endpoint Tests ==

#[tokio::test]
async fn test_clean_endpoint_removes_expired() {
    let app = create_test_app();
    put_value(&app, "http://domain.com/live", "v").await;
    send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"url":"http://domain.com/dead","value":"v","max_age_ms":-1}"#),
    )
    .await;

    let response = send(&app, "POST", "/clean", None).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 1);

    let response = send(&app, "GET", "/stats", None).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["expirations"], 1);
}

// == Pending Endpoint Tests ==

#[tokio::test]
async fn test_announce_and_wait() {
    let app = create_test_app();
    let uri = format!("/announce?url={}", url_param("http://domain.com/slow"));

    let first = body_to_json(send(&app, "POST", &uri, None).await.into_body()).await;
    let second = body_to_json(send(&app, "POST", &uri, None).await.into_body()).await;
    assert_eq!(first["announced"], true);
    assert_eq!(second["announced"], false);

    let waiter_app = app.clone();
    let waiting = tokio::spawn(async move {
        let uri = format!("/wait?url={}", url_param("http://domain.com/slow"));
        send(&waiter_app, "GET", &uri, None).await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    put_value(&app, "http://domain.com/slow", "fetched").await;

    let response = waiting.await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], "fetched");
}

#[tokio::test]
async fn test_wait_timeout() {
    let state = AppState::new(UrlCache::with_defaults()).with_wait_timeout(Duration::from_millis(20));
    let app = create_router(state);

    let uri = format!("/wait?url={}", url_param("http://domain.com/never"));
    let response = send(&app, "GET", &uri, None).await;

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

    let response = send(&app, "GET", "/stats", None).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["pending"], 0);
}

#[tokio::test]
async fn test_announce_after_wait_claims_fetch() {
    let app = create_test_app();
    let url = "http://domain.com/queued";

    let waiter_app = app.clone();
    let waiting = tokio::spawn(async move {
        let uri = format!("/wait?url={}", url_param(url));
        send(&waiter_app, "GET", &uri, None).await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let uri = format!("/announce?url={}", url_param(url));
    let json = body_to_json(send(&app, "POST", &uri, None).await.into_body()).await;
    assert_eq!(json["announced"], true);

    put_value(&app, url, "fetched").await;
    let json = body_to_json(waiting.await.unwrap().into_body()).await;
    assert_eq!(json["value"], "fetched");
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = send(&app, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = send(&app, "PUT", "/set", Some("not valid json")).await;

    // Axum returns 4xx for JSON parsing errors
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_invalid_url_request() {
    let app = create_test_app();

    let response = put_value(&app, "url", "v").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_value(&app, "mailto:someone@domain.com", "v").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_url_parameter() {
    let app = create_test_app();

    let response = send(&app, "GET", "/get", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Expiration via API Tests ==

#[tokio::test]
async fn test_max_age_expiration_via_api() {
    let options = CacheOptions::default().with_max_age(MaxAge::from_millis(50));
    let app = create_router(AppState::new(UrlCache::new(options)));

    put_value(&app, "http://domain.com/", "v").await;
    assert_eq!(get_value(&app, "http://domain.com/").await.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(
        get_value(&app, "http://domain.com/").await.status(),
        StatusCode::NOT_FOUND
    );
}
