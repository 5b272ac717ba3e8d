//! # cms-core
//!
//! Domain layer containing entities, value objects, and repository traits for
//! admin authentication. This crate has zero dependencies on infrastructure
//! (database, token encoding, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{AdminUser, NewAdminUser, NewRefreshToken, RefreshToken, UserIdentity};
pub use error::DomainError;
pub use traits::{AdminUserRepository, Clock, RefreshTokenRepository, RepoResult, SystemClock};
pub use value_objects::{
    AdminRole, ClientInfo, IdParseError, RefreshTokenId, RoleParseError, UserId,
    MAX_DEVICE_INFO_LEN,
};
