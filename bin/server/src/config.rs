//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables.

use serde::Deserialize;

/// Server configuration composed from section configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// PostgreSQL database connection URL.
    pub database_url: String,

    /// Base URL of the versioned API, as seen by outbound clients.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Public URL of the frontend. Used for CORS and activation links.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Deployment namespace: "development", "staging", or "production".
    /// Outside production, outbound email is sandboxed to the logs.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Database pool configuration.
    #[serde(default)]
    pub db: DbConfig,

    /// Token authentication configuration.
    pub auth: AuthConfig,

    /// Outbound email configuration.
    #[serde(default)]
    pub mail: MailConfig,

    /// User cache configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Request rate limiting configuration.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Database pool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// Maximum number of open connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds a connection may sit idle before being closed.
    #[serde(default = "default_idle_timeout_seconds")]
    pub idle_timeout_seconds: u64,
}

/// Token authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify tokens.
    pub token_secret: String,

    /// Token lifetime in hours.
    #[serde(default = "default_token_lifetime_hours")]
    pub token_lifetime_hours: i64,

    /// Issuer and audience claim for issued tokens.
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

/// Outbound email configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Sender address for account emails.
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// Resend API key. May be empty outside production, where email
    /// delivery is sandboxed.
    #[serde(default)]
    pub resend_api_key: String,

    /// Minutes before an activation invitation expires.
    #[serde(default = "default_invitation_exp_minutes")]
    pub invitation_exp_minutes: i64,
}

/// User cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Whether the user cache is enabled.
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,

    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
}

/// Request rate limiting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enforced.
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,

    /// Maximum requests allowed per client per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds.
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

fn default_api_url() -> String {
    "http://localhost:8080/v1".to_owned()
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_owned()
}

fn default_namespace() -> String {
    "development".to_owned()
}

fn default_max_connections() -> u32 {
    30
}

fn default_idle_timeout_seconds() -> u64 {
    900
}

fn default_token_lifetime_hours() -> i64 {
    24
}

fn default_issuer() -> String {
    "sandpiper".to_owned()
}

fn default_from_email() -> String {
    "Sandpiper <onboarding@resend.dev>".to_owned()
}

fn default_invitation_exp_minutes() -> i64 {
    15
}

fn default_redis_enabled() -> bool {
    true
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_owned()
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_max_requests() -> u32 {
    20
}

fn default_window_seconds() -> u64 {
    5
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            idle_timeout_seconds: default_idle_timeout_seconds(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_email: default_from_email(),
            resend_api_key: String::new(),
            invitation_exp_minutes: default_invitation_exp_minutes(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_redis_enabled(),
            url: default_redis_url(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Whether this deployment is running in production.
    pub fn is_production(&self) -> bool {
        self.namespace == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a config from a fake process environment, through the
    /// same source `from_env` uses.
    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, config::ConfigError> {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();

        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(map)),
            )
            .build()?
            .try_deserialize()
    }

    #[test]
    fn api_url_defaults_to_localhost_v1() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/sandpiper"),
            ("AUTH__TOKEN_SECRET", "test-secret"),
        ])
        .expect("should load");

        assert_eq!(config.api_url, "http://localhost:8080/v1");
    }

    #[test]
    fn api_url_env_var_overrides_the_default() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/sandpiper"),
            ("AUTH__TOKEN_SECRET", "test-secret"),
            ("API_URL", "https://api.example.com/v1"),
        ])
        .expect("should load");

        assert_eq!(config.api_url, "https://api.example.com/v1");
    }

    #[test]
    fn db_config_has_correct_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.max_connections, 30);
        assert_eq!(config.idle_timeout_seconds, 900);
    }

    #[test]
    fn rate_limit_config_has_correct_defaults() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_requests, 20);
        assert_eq!(config.window_seconds, 5);
    }

    #[test]
    fn mail_config_defaults_to_sandboxed_sender() {
        let config = MailConfig::default();
        assert!(config.resend_api_key.is_empty());
        assert_eq!(config.invitation_exp_minutes, 15);
    }
}
