//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BootstrapConfig, ConfigError, DatabaseConfig, Environment, JwtConfig,
    MAX_TOKEN_EXPIRY_SECS,
};
