//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{RefreshTokenId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Admin user not found: {0}")]
    UserNotFound(UserId),

    #[error("Admin user not found: {0}")]
    UsernameNotFound(String),

    #[error("Refresh token not found: {0}")]
    RefreshTokenNotFound(RefreshTokenId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already in use: {0}")]
    UsernameAlreadyExists(String),

    #[error("Refresh token collision")]
    TokenAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) | Self::UsernameNotFound(_) => "UNKNOWN_USER",
            Self::RefreshTokenNotFound(_) => "UNKNOWN_TOKEN",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::InvalidRole(_) => "INVALID_ROLE",

            Self::UsernameAlreadyExists(_) => "USERNAME_ALREADY_EXISTS",
            Self::TokenAlreadyExists => "TOKEN_ALREADY_EXISTS",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::UsernameNotFound(_) | Self::RefreshTokenNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidUsername(_) | Self::InvalidRole(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UsernameAlreadyExists(_) | Self::TokenAlreadyExists)
    }
}
