//! Sign-in, sign-out and password reset handlers

use crate::{cookies::CookieJar, error::ApiError, state::AppState};
use axum::{
    Form, Json,
    extract::State,
    http::HeaderMap,
    response::{Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};
use wishit_client::auth::{
    self, CodeCheck, SEND_CODE_FAILED, SIGN_IN_FAILED, VERIFY_CODE_FAILED, sign_in_message,
};
use wishit_core::{Route, session};

/// Sign-in form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Email address
    #[serde(default)]
    pub email: String,
    /// Password
    #[serde(default)]
    pub password: String,
}

/// Reset code request
#[derive(Debug, Deserialize)]
pub struct ResetCodeRequest {
    /// Account email
    #[serde(default)]
    pub email: String,
}

/// Reset code verification
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    /// Account email
    #[serde(default)]
    pub email: String,
    /// Code received by email
    #[serde(default)]
    pub code: String,
}

fn back_to_login(jar: CookieJar, message: &str) -> Response {
    let target = format!("{}?error={}", Route::Login.path(), urlencoding::encode(message));
    jar.apply(Redirect::to(&target))
}

/// `POST /login`: sign in, set the session cookies and go to the landing page
///
/// Failures come back to `/login?error=...`.
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let mut jar = CookieJar::from_headers(&headers, state.session());

    let signed_in = match auth::sign_in(&state.api_client, &form.email, &form.password).await {
        Ok(signed_in) => signed_in,
        Err(err) => {
            warn!("Sign-in failed for {}: {}", form.email.trim(), err);
            return back_to_login(jar, &sign_in_message(&err));
        }
    };

    match signed_in.establish(&mut jar) {
        Ok(route) => jar.apply(Redirect::to(route.path())),
        Err(err) => {
            error!("Failed to store session: {}", err);
            back_to_login(jar, SIGN_IN_FAILED)
        }
    }
}

/// `GET|POST /logout`: clear the session cookies and go to `/login`
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let mut jar = CookieJar::from_headers(&headers, state.session());
    let route = session::logout(&mut jar);
    info!("Session cleared");
    jar.apply(Redirect::to(route.path()))
}

/// `POST /forgot-password`: ask the backend to email a reset code
///
/// # Errors
///
/// Returns an [`ApiError`] carrying the message to show.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResetCodeRequest>,
) -> Result<Json<Value>, ApiError> {
    match auth::request_reset_code(&state.api_client, &request.email).await {
        Ok(message) => Ok(Json(json!({ "sent": true, "message": message }))),
        Err(err) => {
            warn!("Reset code request failed: {}", err);
            Err(ApiError::backend(&err, err.message_or(SEND_CODE_FAILED)))
        }
    }
}

/// `POST /forgot-password/verify`: check the code, pointing to the reset page on success
///
/// # Errors
///
/// Returns an [`ApiError`] when the backend cannot verify the code.
pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyCodeRequest>,
) -> Result<Json<Value>, ApiError> {
    match auth::verify_reset_code(&state.api_client, &request.email, &request.code).await {
        Ok(CodeCheck::Accepted { redirect }) => {
            Ok(Json(json!({ "permission": true, "redirect": redirect })))
        }
        Ok(refused @ CodeCheck::Refused) => {
            Ok(Json(json!({ "permission": false, "message": refused.message() })))
        }
        Err(err) => {
            warn!("Reset code verification failed: {}", err);
            Err(ApiError::backend(&err, err.message_or(VERIFY_CODE_FAILED)))
        }
    }
}
