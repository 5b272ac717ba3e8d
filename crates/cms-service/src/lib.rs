//! # cms-service
//!
//! Application layer containing the authentication use cases, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AdminUserService, AuthService, BootstrapOutcome, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
