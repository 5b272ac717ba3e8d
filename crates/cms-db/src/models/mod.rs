//! Database models - SQLx-compatible structs for SQLite tables

mod admin_user;
mod refresh_token;

pub use admin_user::AdminUserModel;
pub use refresh_token::RefreshTokenModel;
