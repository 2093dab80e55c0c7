//! Shared helpers for the web integration tests

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use serde_json::{Value, json};
use std::sync::Once;
use tower::ServiceExt;
use wishit_core::Config;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// No listener on the discard port; for tests that must not reach a backend
pub const NO_BACKEND: &str = "http://127.0.0.1:9";

/// Dashboard router talking to `backend`
pub fn app(backend: &str) -> Router {
    init_test_logging();
    let mut config = Config::default();
    config.backend.base_url = backend.to_string();
    wishit_web::build_app(config)
}

/// Raw `Cookie` header carrying a session
pub fn session_cookie_header(token: &str, user: &Value) -> String {
    format!(
        "token={}; user={}",
        urlencoding::encode(token),
        urlencoding::encode(&user.to_string())
    )
}

/// Cookies of a signed-in administrator
pub fn admin_cookies() -> String {
    session_cookie_header(
        "jwt-token",
        &json!({"_id": "a1", "email": "admin@wishit.app", "fullName": "Admin", "isAdmin": true}),
    )
}

/// Cookies of a signed-in regular user
pub fn member_cookies() -> String {
    session_cookie_header(
        "jwt-token",
        &json!({"_id": "m1", "email": "member@wishit.app", "isAdmin": false}),
    )
}

/// `GET` request, optionally with cookies
pub fn get(uri: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::empty()).unwrap()
}

/// Form `POST` request
pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

/// JSON `POST` request
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `DELETE` request with cookies
pub fn delete(uri: &str, cookies: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::COOKIE, cookies)
        .body(Body::empty())
        .unwrap()
}

/// Run one request through the router
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// `Location` header of a redirect
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// All `Set-Cookie` values of a response
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// `Cookie` header a browser would send after receiving `set_cookies`
pub fn replay(set_cookies: &[String]) -> String {
    set_cookies
        .iter()
        .filter_map(|cookie| cookie.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Response body as JSON
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Response body as text
pub async fn text_body(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
