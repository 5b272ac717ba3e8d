//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Signing secret used outside production when `JWT_SECRET` is unset
const DEVELOPMENT_JWT_SECRET: &str = "development-only-secret-change-me-before-deploying";

/// Shortest secret accepted in production
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Longest token lifetime accepted from configuration (ten years, in seconds)
pub const MAX_TOKEN_EXPIRY_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub bootstrap: BootstrapConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// JWT / token lifetime configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

/// Default administrative account created by `bootstrap`
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_bootstrap_username")]
    pub username: String,
    #[serde(default = "default_bootstrap_password")]
    pub password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            username: default_bootstrap_username(),
            password: default_bootstrap_password(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "site-cms".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_database_url() -> String {
    "sqlite://website.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn default_access_token_expiry() -> i64 {
    1800 // 30 minutes
}

fn default_refresh_token_expiry() -> i64 {
    604_800 // 7 days
}

fn default_bootstrap_username() -> String {
    "admin".to_string()
}

fn default_bootstrap_password() -> String {
    "admin".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is out of range
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is out of range
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &'static str| -> Result<Option<i64>, ConfigError> {
            lookup(key)
                .map(|v| v.parse::<i64>().map_err(|_| ConfigError::InvalidValue(key, v)))
                .transpose()
        };

        let env = lookup("APP_ENV")
            .and_then(|s| Environment::parse(&s))
            .unwrap_or_default();

        let secret = match lookup("JWT_SECRET") {
            Some(secret) => {
                if env.is_production() && secret.len() < MIN_PRODUCTION_SECRET_LEN {
                    return Err(ConfigError::InvalidValue(
                        "JWT_SECRET",
                        format!("must be at least {MIN_PRODUCTION_SECRET_LEN} bytes in production"),
                    ));
                }
                secret
            }
            None if env.is_production() => return Err(ConfigError::MissingVar("JWT_SECRET")),
            None => {
                tracing::warn!("JWT_SECRET not set, using the development signing secret");
                DEVELOPMENT_JWT_SECRET.to_string()
            }
        };

        let access_token_expiry =
            parsed("JWT_ACCESS_TOKEN_EXPIRY")?.unwrap_or_else(default_access_token_expiry);
        let refresh_token_expiry =
            parsed("JWT_REFRESH_TOKEN_EXPIRY")?.unwrap_or_else(default_refresh_token_expiry);

        if access_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "JWT_ACCESS_TOKEN_EXPIRY",
                access_token_expiry.to_string(),
            ));
        }
        for (key, value) in [
            ("JWT_ACCESS_TOKEN_EXPIRY", access_token_expiry),
            ("JWT_REFRESH_TOKEN_EXPIRY", refresh_token_expiry),
        ] {
            if value > MAX_TOKEN_EXPIRY_SECS {
                return Err(ConfigError::InvalidValue(
                    key,
                    format!("{value} exceeds the maximum of {MAX_TOKEN_EXPIRY_SECS} seconds"),
                ));
            }
        }
        if refresh_token_expiry <= access_token_expiry {
            return Err(ConfigError::InvalidValue(
                "JWT_REFRESH_TOKEN_EXPIRY",
                format!("{refresh_token_expiry} must exceed the access token expiry"),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or_else(default_database_url),
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: lookup("DATABASE_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
                acquire_timeout_secs: lookup("DATABASE_ACQUIRE_TIMEOUT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_acquire_timeout_secs),
            },
            jwt: JwtConfig {
                secret,
                access_token_expiry,
                refresh_token_expiry,
            },
            bootstrap: BootstrapConfig {
                username: lookup("BOOTSTRAP_ADMIN_USERNAME")
                    .unwrap_or_else(default_bootstrap_username),
                password: lookup("BOOTSTRAP_ADMIN_PASSWORD")
                    .unwrap_or_else(default_bootstrap_password),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
