//! Page handlers serving the HTML shells
//!
//! Pages are static; they load their data from the JSON endpoints. The guard
//! runs before any template is returned.

use crate::{cookies::CookieJar, guard::require_page, state::AppState};
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::warn;
use wishit_core::{
    Route,
    session::{SessionState, clear_session, landing_route, read_session},
};

/// Serve `template` if the session may view `route`
fn guarded(state: &AppState, headers: &HeaderMap, route: Route, template: &'static str) -> Response {
    let Some(role) = route.required_role() else {
        return Html(template).into_response();
    };
    match require_page(CookieJar::from_headers(headers, state.session()), role) {
        Ok(_) => Html(template).into_response(),
        Err(refusal) => refusal,
    }
}

/// Where `/`, unknown paths and `/login` send a visitor
///
/// Corrupt cookies are cleared on the way.
fn destination(state: &AppState, headers: &HeaderMap) -> (CookieJar, Option<Route>) {
    let mut jar = CookieJar::from_headers(headers, state.session());
    match read_session(&jar) {
        Ok(session) => (jar, Some(landing_route(&session.user))),
        Err(SessionState::Corrupt) => {
            warn!("Clearing corrupt session cookies");
            clear_session(&mut jar);
            (jar, None)
        }
        Err(SessionState::Absent) => (jar, None),
    }
}

/// `/` and unknown paths: landing page if signed in, otherwise sign-in
pub async fn landing(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (jar, route) = destination(&state, &headers);
    let target = route.unwrap_or(Route::Login);
    jar.apply(Redirect::to(target.path()))
}

/// Sign-in page; signed-in users go straight to their landing page
pub async fn login_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match destination(&state, &headers) {
        (jar, Some(route)) => jar.apply(Redirect::to(route.path())),
        (jar, None) => jar.apply(Html(include_str!("../../templates/login.html"))),
    }
}

/// Password reset code request page
pub async fn forgot_password_page() -> Html<&'static str> {
    Html(include_str!("../../templates/forgot_password.html"))
}

/// New password page
pub async fn reset_password_page() -> Html<&'static str> {
    Html(include_str!("../../templates/reset_password.html"))
}

/// Landing page for users without administrator rights
pub async fn dashboard(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    guarded(&state, &headers, Route::Dashboard, include_str!("../../templates/dashboard.html"))
}

/// Administrator home
pub async fn admin_dashboard(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    guarded(&state, &headers, Route::AdminDashboard, include_str!("../../templates/admin_dashboard.html"))
}

/// User management
pub async fn users_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    guarded(&state, &headers, Route::Users, include_str!("../../templates/users.html"))
}

/// Post moderation
pub async fn publications_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    guarded(&state, &headers, Route::Publications, include_str!("../../templates/publications.html"))
}

/// Gift list moderation
pub async fn gifts_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    guarded(&state, &headers, Route::Gifts, include_str!("../../templates/gifts.html"))
}

/// Statistics charts
pub async fn stats_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    guarded(&state, &headers, Route::Stats, include_str!("../../templates/stats.html"))
}

/// Settings
pub async fn settings_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    guarded(&state, &headers, Route::Settings, include_str!("../../templates/settings.html"))
}
