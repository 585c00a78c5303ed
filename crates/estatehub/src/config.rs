//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Placeholder secret shipped in the sample configuration
const PLACEHOLDER_JWT_SECRET: &str = "change-me-in-production";

/// Longest session lifetime accepted (ten years)
const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origins allowed to send credentialed requests
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration
///
/// `token_ttl_secs` has no default: deployments must choose a session
/// lifetime explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    #[serde(default)]
    pub cookie_secure: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "./data/estatehub.db".to_string()
}

fn default_jwt_secret() -> String {
    PLACEHOLDER_JWT_SECRET.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);
        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at {}; an [auth] section with token_ttl_secs is required",
                path
            );
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            anyhow::bail!("auth.jwt_secret must not be empty");
        }
        if self.auth.token_ttl_secs <= 0 {
            anyhow::bail!(
                "auth.token_ttl_secs must be positive, got {}",
                self.auth.token_ttl_secs
            );
        }
        if self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            anyhow::bail!(
                "auth.token_ttl_secs must be at most {}, got {}",
                MAX_TOKEN_TTL_SECS,
                self.auth.token_ttl_secs
            );
        }
        if self.auth.jwt_secret == PLACEHOLDER_JWT_SECRET {
            warn!("auth.jwt_secret is the placeholder value; set ESTATEHUB_JWT_SECRET");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sample_config_is_valid() {
        let config = Config::parse(include_str!("../../../config/default.toml")).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.token_ttl_secs, 86400);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = Config::parse("[auth]\ntoken_ttl_secs = 60\n").unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.database.path, "./data/estatehub.db");
        assert_eq!(config.logging.level, "info");
        assert!(!config.auth.cookie_secure);
    }

    #[test]
    fn test_token_ttl_is_required() {
        assert!(Config::parse("[auth]\njwt_secret = \"s3cret\"\n").is_err());
        assert!(Config::parse("[server]\nport = 8080\n").is_err());
    }

    #[test]
    fn test_validate_rejects_unusable_auth() {
        let mut config = Config::parse("[auth]\ntoken_ttl_secs = 0\n").unwrap();
        assert!(config.validate().is_err());

        config.auth.token_ttl_secs = 60;
        config.auth.jwt_secret = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_token_ttl() {
        let mut config =
            Config::parse("[auth]\njwt_secret = \"s3cret\"\ntoken_ttl_secs = 100000000000000\n")
                .unwrap();
        assert!(config.validate().is_err());

        config.auth.token_ttl_secs = MAX_TOKEN_TTL_SECS;
        assert!(config.validate().is_ok());

        config.auth.token_ttl_secs = MAX_TOKEN_TTL_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[auth]\njwt_secret = \"file-secret\"\ntoken_ttl_secs = 3600\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.auth.jwt_secret, "file-secret");
        assert_eq!(config.logging.format, LogFormat::Json);

        assert!(Config::load("/nonexistent/estatehub.toml").is_err());
    }
}
