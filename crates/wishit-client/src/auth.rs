//! Sign-in and password reset flows
//!
//! Network calls and session writes are split: the async half talks to the
//! backend, [`SignedIn::establish`] then writes the session synchronously so
//! no store borrow is held across an await.

use crate::{
    api_client::{ApiClient, SignInResponse},
    error::{ClientError, ClientResult},
};
use tracing::{info, warn};
use wishit_core::{
    Route, SessionStore, SessionUser,
    session::{landing_route, set_session},
};

/// Shown when a sign-in field is empty
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";
/// Shown when the backend answers `success: false`
pub const SIGN_IN_FAILED: &str = "Sign-in failed. Please try again.";
/// Shown for HTTP 401 on sign-in
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
/// Shown for HTTP 404 on sign-in
pub const USER_NOT_FOUND: &str = "User not found";
/// Shown for other sign-in failures without a backend message
pub const SIGN_IN_ERROR: &str = "Error while signing in. Please try again.";
/// Shown when the reset email is empty
pub const EMAIL_REQUIRED: &str = "Email is required";
/// Shown when sending the reset code fails without a backend message
pub const SEND_CODE_FAILED: &str = "Failed to send the code. Please try again.";
/// Shown when the verification code is refused
pub const INCORRECT_CODE: &str = "Incorrect verification code.";
/// Shown when verifying the code fails without a backend message
pub const VERIFY_CODE_FAILED: &str = "Failed to verify the code. Please try again.";

/// Credentials accepted by the backend, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    /// Bearer token
    pub token: String,
    /// Signed-in user
    pub user: SessionUser,
}

impl SignedIn {
    /// Replace the stored session and return the landing route for the user
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the session.
    pub fn establish(&self, store: &mut dyn SessionStore) -> wishit_core::Result<Route> {
        set_session(store, &self.token, &self.user)?;
        let route = landing_route(&self.user);
        info!("User {} signed in, landing on {}", self.user.email, route);
        Ok(route)
    }
}

/// Message for a failed sign-in
#[must_use]
pub fn sign_in_message(err: &ClientError) -> String {
    match err.status() {
        Some(401) => INVALID_CREDENTIALS.to_string(),
        Some(404) => USER_NOT_FOUND.to_string(),
        _ if matches!(err, ClientError::Rejected) => SIGN_IN_FAILED.to_string(),
        _ => err.message_or(SIGN_IN_ERROR),
    }
}

/// Validate the credentials and sign in
///
/// # Errors
///
/// Returns [`ClientError::Validation`] when a field is empty (no request is
/// sent), [`ClientError::Rejected`] when the backend refuses without an error
/// status, or the request error otherwise.
pub async fn sign_in(client: &ApiClient, email: &str, password: &str) -> ClientResult<SignedIn> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ClientError::validation(FILL_ALL_FIELDS));
    }

    let response = client.sign_in(email, password).await?;
    match response {
        SignInResponse {
            success: true,
            token: Some(token),
            user: Some(user),
            ..
        } if !token.is_empty() => Ok(SignedIn { token, user }),
        other => {
            warn!(
                "Sign-in refused for {}: {}",
                email,
                other.message.as_deref().unwrap_or("no message")
            );
            Err(ClientError::Rejected)
        }
    }
}

/// Ask the backend to email a reset code
///
/// # Errors
///
/// Returns [`ClientError::Validation`] for an empty email, or the request error.
pub async fn request_reset_code(client: &ApiClient, email: &str) -> ClientResult<Option<String>> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ClientError::validation(EMAIL_REQUIRED));
    }
    client.request_reset_code(email).await
}

/// Result of checking a reset code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeCheck {
    /// Code accepted; continue to this reset URL
    Accepted {
        /// `/reset-password?email=...`
        redirect: String,
    },
    /// Code refused
    Refused,
}

impl CodeCheck {
    /// Message for a refused code
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Accepted { .. } => None,
            Self::Refused => Some(INCORRECT_CODE),
        }
    }
}

/// Reset page URL carrying the email
#[must_use]
pub fn reset_password_url(email: &str) -> String {
    format!("{}?email={}", Route::ResetPassword.path(), urlencoding::encode(email))
}

/// Check a reset code
///
/// # Errors
///
/// Returns [`ClientError::Validation`] for an empty email or code, or the
/// request error.
pub async fn verify_reset_code(client: &ApiClient, email: &str, code: &str) -> ClientResult<CodeCheck> {
    let (email, code) = (email.trim(), code.trim());
    if email.is_empty() || code.is_empty() {
        return Err(ClientError::validation(FILL_ALL_FIELDS));
    }

    if client.verify_code(email, code).await? {
        Ok(CodeCheck::Accepted {
            redirect: reset_password_url(email),
        })
    } else {
        Ok(CodeCheck::Refused)
    }
}
