//! Session persistence and the route guard
//!
//! A session is two independent string entries in a key-value store: the
//! bearer `token` and the JSON-serialized `user`. Both exist together or the
//! visitor is treated as signed out. Every screen goes through [`authorize`]
//! instead of reading the store itself.

use crate::{Result, types::SessionUser};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Store key holding the bearer token
pub const TOKEN_KEY: &str = "token";
/// Store key holding the JSON-serialized user
pub const USER_KEY: &str = "user";

/// Key-value persistence surface backing the session
pub trait SessionStore {
    /// Read an entry
    fn get(&self, key: &str) -> Option<String>;

    /// Write an entry, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete an entry; deleting an absent key is not an error
    fn remove(&mut self, key: &str);
}

/// In-memory store, used by tools and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// A complete, parsed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token for backend requests
    pub token: String,
    /// Signed-in user
    pub user: SessionUser,
}

/// Role a screen requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Any signed-in user
    Any,
    /// Administrators only
    Admin,
}

/// Dashboard routes the guard and the sign-in flow navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    /// `/login`
    Login,
    /// `/dashboard`, the non-admin landing page
    Dashboard,
    /// `/admin-dashboard`, the admin landing page
    AdminDashboard,
    /// `/users`
    Users,
    /// `/publications`
    Publications,
    /// `/gifts`
    Gifts,
    /// `/stats`
    Stats,
    /// `/settings`
    Settings,
    /// `/forgot-password`
    ForgotPassword,
    /// `/reset-password`
    ResetPassword,
}

impl Route {
    /// Path of the route
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::AdminDashboard => "/admin-dashboard",
            Self::Users => "/users",
            Self::Publications => "/publications",
            Self::Gifts => "/gifts",
            Self::Stats => "/stats",
            Self::Settings => "/settings",
            Self::ForgotPassword => "/forgot-password",
            Self::ResetPassword => "/reset-password",
        }
    }

    /// Role needed to view the route; `None` for public routes
    #[must_use]
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::Login | Self::ForgotPassword | Self::ResetPassword => None,
            Self::Dashboard => Some(Role::Any),
            Self::AdminDashboard
            | Self::Users
            | Self::Publications
            | Self::Gifts
            | Self::Stats
            | Self::Settings => Some(Role::Admin),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Result of running the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Access granted to the signed-in user
    Allow(SessionUser),
    /// Access refused; navigate to the route instead
    Redirect(Route),
}

/// Why [`get_session`] found no usable session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Neither entry, or only one of them, is present
    Absent,
    /// Both entries present but the user entry does not parse
    Corrupt,
}

/// Read the session, distinguishing absence from corruption
///
/// # Errors
///
/// Returns the [`SessionState`] explaining why no session is available.
pub fn read_session(store: &dyn SessionStore) -> std::result::Result<Session, SessionState> {
    let (Some(token), Some(raw_user)) = (store.get(TOKEN_KEY), store.get(USER_KEY)) else {
        return Err(SessionState::Absent);
    };
    if token.is_empty() || raw_user.is_empty() {
        return Err(SessionState::Absent);
    }
    match serde_json::from_str::<SessionUser>(&raw_user) {
        Ok(user) => Ok(Session { token, user }),
        Err(err) => {
            warn!("Stored session user is unparsable: {}", err);
            Err(SessionState::Corrupt)
        }
    }
}

/// Read the session; `None` for absent or corrupt state
#[must_use]
pub fn get_session(store: &dyn SessionStore) -> Option<Session> {
    read_session(store).ok()
}

/// Replace the session with a new token and user
///
/// # Errors
///
/// Returns an error if the user cannot be serialized or the store rejects a
/// write; in that case the store is cleared so no half session remains.
pub fn set_session(store: &mut dyn SessionStore, token: &str, user: &SessionUser) -> Result<()> {
    let raw_user = serde_json::to_string(user)?;
    let written = store
        .set(TOKEN_KEY, token)
        .and_then(|()| store.set(USER_KEY, &raw_user));
    if written.is_err() {
        clear_session(store);
    }
    written
}

/// Remove both session entries
pub fn clear_session(store: &mut dyn SessionStore) {
    store.remove(TOKEN_KEY);
    store.remove(USER_KEY);
}

/// Sign out: clear the session and return where to navigate
pub fn logout(store: &mut dyn SessionStore) -> Route {
    clear_session(store);
    Route::Login
}

/// Decide whether the stored session may view a screen needing `required`
///
/// Absent, half-present and corrupt sessions all redirect to `/login`;
/// signed-in non-admins asking for an admin screen go to `/dashboard`.
#[must_use]
pub fn authorize(store: &dyn SessionStore, required: Role) -> Outcome {
    let session = match read_session(store) {
        Ok(session) => session,
        Err(state) => {
            debug!("No usable session ({:?}), redirecting to login", state);
            return Outcome::Redirect(Route::Login);
        }
    };

    if required == Role::Admin && !session.user.is_admin {
        debug!("User {} is not an administrator", session.user.email);
        return Outcome::Redirect(Route::Dashboard);
    }

    Outcome::Allow(session.user)
}

/// Landing page for a signed-in user
#[must_use]
pub const fn landing_route(user: &SessionUser) -> Route {
    if user.is_admin {
        Route::AdminDashboard
    } else {
        Route::Dashboard
    }
}
