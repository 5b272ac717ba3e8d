//! Data transfer objects for requests and responses
//!
//! - Request DTOs with validation for service inputs
//! - Response DTOs for serializing service outputs

pub mod requests;
pub mod responses;

pub use requests::{CreateAdminUserRequest, LoginRequest, RefreshTokenRequest, RevokeTokenRequest};
pub use responses::{AdminUserResponse, AuthResponse, SessionResponse};
