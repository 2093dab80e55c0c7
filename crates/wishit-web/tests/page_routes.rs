//! Routing and session guard tests that never reach the backend

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

mod common;

use axum::http::{StatusCode, header};
use common::{
    NO_BACKEND, admin_cookies, app, get, json_body, location, member_cookies, post_form, send,
    set_cookies, text_body,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[tokio::test]
async fn test_health_check() {
    let response = send(&app(NO_BACKEND), get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "OK");
}

#[rstest]
#[case("/dashboard")]
#[case("/admin-dashboard")]
#[case("/users")]
#[case("/stats")]
#[case("/")]
#[case("/no-such-page")]
#[tokio::test]
async fn test_signed_out_pages_redirect_to_login(#[case] uri: &str) {
    let response = send(&app(NO_BACKEND), get(uri, None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[rstest]
#[case("/admin-dashboard")]
#[case("/users")]
#[case("/publications")]
#[case("/gifts")]
#[case("/stats")]
#[case("/settings")]
#[tokio::test]
async fn test_member_is_sent_to_dashboard(#[case] uri: &str) {
    let cookies = member_cookies();
    let response = send(&app(NO_BACKEND), get(uri, Some(&cookies))).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_admin_sees_admin_pages() {
    let app = app(NO_BACKEND);
    let cookies = admin_cookies();

    for uri in ["/admin-dashboard", "/users", "/publications", "/gifts", "/stats", "/settings", "/dashboard"] {
        let response = send(&app, get(uri, Some(&cookies))).await;
        assert_eq!(response.status(), StatusCode::OK, "for {uri}");
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }
}

#[rstest]
#[case(Some(admin_cookies()), "/admin-dashboard")]
#[case(Some(member_cookies()), "/dashboard")]
#[tokio::test]
async fn test_signed_in_login_page_redirects(#[case] cookies: Option<String>, #[case] expected: &str) {
    let response = send(&app(NO_BACKEND), get("/login", cookies.as_deref())).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), expected);
}

#[tokio::test]
async fn test_login_page_is_public() {
    let app = app(NO_BACKEND);

    for uri in ["/login", "/forgot-password", "/reset-password?email=a%40b.c"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "for {uri}");
    }
}

#[tokio::test]
async fn test_corrupt_user_cookie_is_cleared() {
    let response = send(
        &app(NO_BACKEND),
        get("/stats", Some("token=jwt-token; user=%7Bnot-json")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let cleared = set_cookies(&response);
    assert_eq!(cleared.len(), 2);
    assert!(cleared.iter().all(|cookie| cookie.ends_with("Max-Age=0")));
    assert!(cleared.iter().any(|cookie| cookie.starts_with("token=;")));
    assert!(cleared.iter().any(|cookie| cookie.starts_with("user=;")));
}

#[tokio::test]
async fn test_token_without_user_is_signed_out() {
    let response = send(&app(NO_BACKEND), get("/dashboard", Some("token=jwt-token"))).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let app = app(NO_BACKEND);
    let cookies = admin_cookies();

    for request in [
        get("/logout", Some(&cookies)),
        axum::http::Request::builder()
            .method("POST")
            .uri("/logout")
            .header(header::COOKIE, &cookies)
            .body(axum::body::Body::empty())
            .unwrap(),
    ] {
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
        let cleared = set_cookies(&response);
        assert_eq!(cleared.len(), 2);
        assert!(cleared.iter().all(|cookie| cookie.contains("Max-Age=0")));
    }
}

#[tokio::test]
async fn test_api_requires_session() {
    let response = send(&app(NO_BACKEND), get("/api/session", None)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["redirect"], "/login");
}

#[tokio::test]
async fn test_api_session_returns_user() {
    let cookies = member_cookies();
    let response = send(&app(NO_BACKEND), get("/api/session", Some(&cookies))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["email"], "member@wishit.app");
    assert_eq!(body["isAdmin"], false);
}

#[rstest]
#[case("/api/admin/stats")]
#[case("/api/admin/users")]
#[tokio::test]
async fn test_admin_api_forbidden_for_members(#[case] uri: &str) {
    let cookies = member_cookies();
    let response = send(&app(NO_BACKEND), get(uri, Some(&cookies))).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"], "FORBIDDEN");
    assert_eq!(body["redirect"], "/dashboard");
}

#[tokio::test]
async fn test_unknown_collection_not_found() {
    let cookies = admin_cookies();
    let response = send(&app(NO_BACKEND), get("/api/admin/wishes", Some(&cookies))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Unknown collection: wishes");
}

#[tokio::test]
async fn test_login_with_empty_fields_never_calls_backend() {
    let response = send(&app(NO_BACKEND), post_form("/login", "email=&password=secret")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?error=Please%20fill%20in%20all%20fields");
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn test_login_with_backend_down() {
    let response = send(
        &app(NO_BACKEND),
        post_form("/login", "email=admin%40wishit.app&password=secret"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?error=The%20server%20is%20not%20responding");
}

#[tokio::test]
async fn test_admin_pages_follow_session_redirects() {
    let app = app(NO_BACKEND);
    let cookies = admin_cookies();

    for uri in ["/admin-dashboard", "/users", "/publications", "/gifts", "/stats", "/settings", "/dashboard"] {
        let page = text_body(send(&app, get(uri, Some(&cookies))).await).await;
        assert!(page.contains("if (body.redirect)"), "{uri} ignores session redirects");
        assert!(!page.contains("fetch(\"/api/"), "{uri} fetches without the redirect check");
    }
}
