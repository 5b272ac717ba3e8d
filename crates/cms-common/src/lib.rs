//! # cms-common
//!
//! Shared utilities including configuration, error handling, authentication
//! primitives, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    bearer_token, dummy_verify_password, generate_refresh_token, hash_password,
    hash_refresh_token, validate_password_strength, verify_password, AccessToken, Claims,
    JwtService, TokenPair,
};
pub use config::{
    AppConfig, AppSettings, BootstrapConfig, ConfigError, DatabaseConfig, Environment, JwtConfig,
    MAX_TOKEN_EXPIRY_SECS,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
