//! Session guard applied at the routing boundary

use crate::{cookies::CookieJar, error::ApiError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::warn;
use wishit_core::{
    Outcome, Role, Route, Session, SessionStore,
    session::{SessionState, TOKEN_KEY, authorize, clear_session, read_session},
};

/// Run the guard for a page; a refusal becomes a `303 See Other`
///
/// # Errors
///
/// Returns the redirect response when the session may not view the page.
pub fn require_page(jar: CookieJar, role: Role) -> Result<Session, Response> {
    check(jar, role).map_err(|(jar, route)| jar.apply(Redirect::to(route.path())))
}

/// Run the guard for a JSON endpoint; a refusal becomes 401 or 403
///
/// # Errors
///
/// Returns the error response when the session may not call the endpoint.
pub fn require_api(jar: CookieJar, role: Role) -> Result<Session, Response> {
    check(jar, role).map_err(|(jar, route)| {
        let error = match route {
            Route::Login => ApiError::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Not signed in"),
            _ => ApiError::new(StatusCode::FORBIDDEN, "FORBIDDEN", "Administrator access required"),
        };
        jar.apply(error.with_redirect(route.path()).into_response())
    })
}

fn check(mut jar: CookieJar, role: Role) -> Result<Session, (CookieJar, Route)> {
    match authorize(&jar, role) {
        Outcome::Allow(user) => {
            let token = jar.get(TOKEN_KEY).unwrap_or_default();
            Ok(Session { token, user })
        }
        Outcome::Redirect(route) => {
            if matches!(read_session(&jar), Err(SessionState::Corrupt)) {
                warn!("Clearing corrupt session cookies");
                clear_session(&mut jar);
            }
            Err((jar, route))
        }
    }
}
