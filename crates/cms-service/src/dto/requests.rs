//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use cms_core::value_objects::{AdminRole, ClientInfo};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Username/password login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Client user-agent, stored with the issued session
    #[serde(default)]
    pub device_info: Option<String>,

    #[serde(default)]
    #[validate(length(max = 45, message = "IP address must be at most 45 characters"))]
    pub ip_address: Option<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            device_info: None,
            ip_address: None,
        }
    }

    pub fn with_client(
        mut self,
        device_info: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        self.device_info = Some(device_info.into());
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn client_info(&self) -> ClientInfo {
        ClientInfo::new(self.device_info.clone(), self.ip_address.clone())
    }
}

/// Token refresh request
///
/// Client metadata describes the caller of this refresh and is recorded on the
/// replacement token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,

    #[serde(default)]
    pub device_info: Option<String>,

    #[serde(default)]
    #[validate(length(max = 45, message = "IP address must be at most 45 characters"))]
    pub ip_address: Option<String>,
}

impl RefreshTokenRequest {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
            device_info: None,
            ip_address: None,
        }
    }

    pub fn with_client(
        mut self,
        device_info: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        self.device_info = Some(device_info.into());
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn client_info(&self) -> ClientInfo {
        ClientInfo::new(self.device_info.clone(), self.ip_address.clone())
    }
}

/// Logout: revoke one refresh token
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RevokeTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

impl RevokeTokenRequest {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
        }
    }
}

// ============================================================================
// Admin User Requests
// ============================================================================

/// Create an admin account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdminUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: AdminRole,
}
