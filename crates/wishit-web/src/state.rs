//! Application state management

use wishit_client::ApiClient;
use wishit_core::{Config, config::SessionConfig};

/// Shared, read-only state for every request
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Backend client without credentials; handlers attach the caller's token
    pub api_client: ApiClient,
}

impl AppState {
    /// Create state talking to the configured backend
    #[must_use]
    pub fn new(config: Config) -> Self {
        let api_client = ApiClient::new(config.api_root());

        Self { config, api_client }
    }

    /// Session cookie settings
    #[must_use]
    pub const fn session(&self) -> &SessionConfig {
        &self.config.session
    }

    /// Backend client authenticated as the caller
    #[must_use]
    pub fn client_for(&self, token: &str) -> ApiClient {
        self.api_client.clone().with_token(token)
    }
}
