//! Business logic services
//!
//! Token lifecycle and admin account use cases, orchestrating the repositories
//! and token primitives held by a `ServiceContext`.

pub mod admin_user;
pub mod auth;
pub mod context;
pub mod error;

// Re-export all services for convenience
pub use admin_user::{AdminUserService, BootstrapOutcome};
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
