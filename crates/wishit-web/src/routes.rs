//! Route definitions for the dashboard

use crate::{
    handlers::{api, auth, pages},
    state::AppState,
};
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

/// Build the dashboard router
#[must_use]
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Public pages and sign-in
        .route("/", get(pages::landing))
        .route("/login", get(pages::login_page).post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route(
            "/forgot-password",
            get(pages::forgot_password_page).post(auth::forgot_password),
        )
        .route("/forgot-password/verify", post(auth::verify_code))
        .route("/reset-password", get(pages::reset_password_page))
        // Signed-in pages
        .route("/dashboard", get(pages::dashboard))
        .route("/admin-dashboard", get(pages::admin_dashboard))
        .route("/users", get(pages::users_page))
        .route("/publications", get(pages::publications_page))
        .route("/gifts", get(pages::gifts_page))
        .route("/stats", get(pages::stats_page))
        .route("/settings", get(pages::settings_page))
        // JSON endpoints feeding the pages
        .route("/api/session", get(api::current_session))
        .route("/api/admin/stats", get(api::admin_stats))
        .route("/api/admin/:collection", get(api::list_collection))
        .route("/api/admin/:collection/:id", delete(api::delete_record))
        // Health check
        .route("/health", get(api::health_check))
        .fallback(pages::landing)
}
