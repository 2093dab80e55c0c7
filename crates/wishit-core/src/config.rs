//! Configuration management for the Wishit admin dashboard

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dashboard web server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Backend API configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Session cookie configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the Wishit backend, without the `/api` prefix
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Lifetime of the `token` and `user` cookies in hours
    #[serde(default = "default_cookie_max_age_hours")]
    pub cookie_max_age_hours: u64,

    /// Mark session cookies `Secure`
    #[serde(default)]
    pub secure_cookies: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_backend_url() -> String {
    "http://localhost:4000".to_string()
}

const fn default_cookie_max_age_hours() -> u64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_max_age_hours: default_cookie_max_age_hours(),
            secure_cookies: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from an optional `wishit` file in the working directory
    /// and `WISHIT_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a `wishit.*` file exists but cannot be parsed.
    pub fn load() -> crate::Result<Self> {
        Self::load_in(Path::new("."))
    }

    /// Load configuration from an optional `wishit.*` file in `dir`
    ///
    /// A missing file leaves the defaults in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_in(dir: &Path) -> crate::Result<Self> {
        let base = dir.join("wishit");
        Self::build(config::Config::builder().add_source(
            config::File::with_name(&base.to_string_lossy()).required(false),
        ))
    }

    /// Load configuration from a specific file, still honoring `WISHIT_*` overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        Self::build(config::Config::builder().add_source(config::File::from(path)))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> crate::Result<Self> {
        let config = builder
            .add_source(
                config::Environment::with_prefix("WISHIT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })
    }

    /// Backend API root, e.g. `http://localhost:4000/api`
    #[must_use]
    pub fn api_root(&self) -> String {
        format!("{}/api", self.backend.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.backend.base_url, "http://localhost:4000");
        assert_eq!(config.session.cookie_max_age_hours, 24);
        assert!(!config.session.secure_cookies);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_api_root_strips_trailing_slash() {
        let mut config = Config::default();
        config.backend.base_url = "https://api.wishit.app/".to_string();

        assert_eq!(config.api_root(), "https://api.wishit.app/api");
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "server": {"port": 8081},
            "backend": {"base_url": "http://backend:5000"}
        }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.server.host, "127.0.0.1"); // Uses default
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.backend.base_url, "http://backend:5000");
        assert_eq!(config.session.cookie_max_age_hours, 24);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wishit.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[session]\ncookie_max_age_hours = 2\nsecure_cookies = true\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.session.cookie_max_age_hours, 2);
        assert!(config.session.secure_cookies);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.backend.base_url, "http://localhost:4000");
    }

    #[test]
    fn test_load_from_missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("absent.toml"));

        assert!(matches!(result, Err(crate::Error::Configuration { .. })));
    }

    #[test]
    fn test_load_in_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load_in(dir.path()).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_in_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("wishit.toml"), "[server]\nport = \"not a port\"\n").unwrap();

        let result = Config::load_in(dir.path());

        assert!(matches!(result, Err(crate::Error::Configuration { .. })));
    }

    #[test]
    fn test_default_value_functions() {
        assert_eq!(default_host(), "127.0.0.1");
        assert_eq!(default_port(), 3000);
        assert_eq!(default_backend_url(), "http://localhost:4000");
        assert_eq!(default_cookie_max_age_hours(), 24);
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "text");
    }
}
