//! Repository implementations
//!
//! SQLite implementations of the repository traits defined in cms-core.

mod admin_user;
mod error;
mod refresh_token;

pub use admin_user::SqliteAdminUserRepository;
pub use refresh_token::SqliteRefreshTokenRepository;
