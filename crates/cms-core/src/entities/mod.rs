//! Domain entities - core business objects

mod admin_user;
mod identity;
mod refresh_token;

pub use admin_user::{AdminUser, NewAdminUser};
pub use identity::UserIdentity;
pub use refresh_token::{NewRefreshToken, RefreshToken};
