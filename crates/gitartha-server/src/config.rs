//! Configuration management
//!
//! Values come from the environment, optionally seeded from a `.env` file.

use serde::Serialize;

use crate::db::{parse_var, DbConfig};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default deployment environment name.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default time allowed for in-flight requests after a shutdown signal.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Server configuration
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub environment: String,
    pub server: ServerConfig,
    #[serde(skip)]
    pub database: DbConfig,
    pub cors: CorsConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key/value source, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let config = Config {
            environment: lookup("GITARTHA_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            server: ServerConfig {
                host: lookup("GITARTHA_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
                port: parse_var(&lookup, "GITARTHA_PORT").unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: parse_var(&lookup, "GITARTHA_SHUTDOWN_TIMEOUT")
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            },
            database: DbConfig::from_lookup(&lookup)?,
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: parse_var(&lookup, "CORS_ALLOW_CREDENTIALS").unwrap_or(false),
            },
        };

        config.validate()?;

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.host.is_empty() {
            anyhow::bail!("Server host cannot be empty");
        }

        self.database.validate()?;

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        if self.cors.allow_credentials && self.cors.allowed_origins.iter().any(|o| o == "*") {
            anyhow::bail!("CORS credentials cannot be combined with a wildcard origin");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            database: DbConfig::default(),
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.shutdown_timeout_secs, 5);
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_credentials_with_wildcard() {
        let mut config = Config::default();
        config.cors.allowed_origins = vec!["*".to_string()];
        config.cors.allow_credentials = true;
        assert!(config.validate().is_err());
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/gitartha_test"),
            ("GITARTHA_ENV", "production"),
            ("GITARTHA_PORT", "9090"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ]))
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, DEFAULT_SERVER_HOST);
        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert_eq!(config.cors.allowed_origins[1], "https://b.example");
        assert!(!config.cors.allow_credentials);
    }

    #[test]
    fn test_from_lookup_requires_database_url() {
        assert!(Config::from_lookup(lookup_from(&[("GITARTHA_PORT", "9090")])).is_err());
    }

    #[test]
    fn test_from_lookup_rejects_credentials_with_wildcard() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/gitartha_test"),
            ("CORS_ALLOWED_ORIGINS", "*"),
            ("CORS_ALLOW_CREDENTIALS", "true"),
        ]));
        assert!(result.is_err());
    }

    /// Only touches a variable nothing else in the test binary reads, and
    /// restores it afterwards.
    #[test]
    #[serial]
    fn test_load_reads_process_environment() {
        let previous = std::env::var("GITARTHA_SHUTDOWN_TIMEOUT").ok();
        std::env::set_var("GITARTHA_SHUTDOWN_TIMEOUT", "17");

        let result = Config::load();

        match previous {
            Some(value) => std::env::set_var("GITARTHA_SHUTDOWN_TIMEOUT", value),
            None => std::env::remove_var("GITARTHA_SHUTDOWN_TIMEOUT"),
        }

        if std::env::var("DATABASE_URL").is_ok() {
            assert_eq!(result.unwrap().server.shutdown_timeout_secs, 17);
        } else {
            assert!(result.is_err());
        }
    }
}
