//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use cms_common::auth::TokenPair;
use cms_core::entities::{AdminUser, RefreshToken};
use cms_core::value_objects::{AdminRole, RefreshTokenId, UserId};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Token pair plus the account it was issued to
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: AdminUserResponse,
}

impl AuthResponse {
    pub fn new(tokens: TokenPair, user: AdminUserResponse) -> Self {
        Self { tokens, user }
    }
}

/// An active login, identified by its refresh token row.
///
/// Neither the token nor its digest is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponse {
    pub id: RefreshTokenId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
}

impl From<&RefreshToken> for SessionResponse {
    fn from(token: &RefreshToken) -> Self {
        Self {
            id: token.id,
            created_at: token.created_at,
            expires_at: token.expires_at,
            device_info: token.device_info.clone(),
            ip_address: token.ip_address.clone(),
        }
    }
}

// ============================================================================
// Admin User Responses
// ============================================================================

/// Admin account (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUserResponse {
    pub id: UserId,
    pub username: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&AdminUser> for AdminUserResponse {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}
