//! Browser cookies as the session store
//!
//! Incoming `Cookie` headers are parsed once per request. Writes and removals
//! update the in-request view immediately and queue a `Set-Cookie` header that
//! [`CookieJar::apply`] attaches to the response.

use axum::{
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use tracing::debug;
use wishit_core::{Error, Result, SessionStore, config::SessionConfig};

/// Session cookies read from the request and written back on the response
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    values: HashMap<String, String>,
    pending: Vec<String>,
    max_age_hours: u64,
    secure: bool,
}

impl CookieJar {
    /// Parse the request's cookies
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, session: &SessionConfig) -> Self {
        let values = cookie_pairs(headers)
            .filter_map(|(name, raw)| {
                let value = urlencoding::decode(raw).ok()?;
                Some((name.to_string(), value.into_owned()))
            })
            .collect();

        Self {
            values,
            pending: Vec::new(),
            max_age_hours: session.cookie_max_age_hours,
            secure: session.secure_cookies,
        }
    }

    /// `Set-Cookie` values queued so far
    #[must_use]
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Attach the queued `Set-Cookie` headers to a response
    pub fn apply(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        for cookie in self.pending {
            // Values were validated when queued
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

impl SessionStore for CookieJar {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let cookie = session_cookie(key, value, self.max_age_hours, self.secure);
        if HeaderValue::from_str(&cookie).is_err() {
            return Err(Error::Session(format!("cookie {key} is not a valid header value")));
        }
        debug!("Setting cookie {}", key);
        self.pending.push(cookie);
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.pending.push(clear_session_cookie(key));
        self.values.remove(key);
    }
}

fn cookie_pairs(headers: &HeaderMap) -> impl Iterator<Item = (&str, &str)> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|cookie| {
            let (key, val) = cookie.trim().split_once('=')?;
            Some((key.trim(), val.trim()))
        })
}

/// Raw value of the named cookie, if the request carries it
#[must_use]
pub fn get_cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    cookie_pairs(headers).find_map(|(key, val)| (key == name).then_some(val))
}

/// `Set-Cookie` value persisting a session entry
#[must_use]
pub fn session_cookie(name: &str, value: &str, max_age_hours: u64, secure: bool) -> String {
    let max_age_secs = max_age_hours * 3600;
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        name,
        urlencoding::encode(value),
        max_age_secs,
        secure
    )
}

/// `Set-Cookie` value deleting a session entry
#[must_use]
pub fn clear_session_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0")
}
