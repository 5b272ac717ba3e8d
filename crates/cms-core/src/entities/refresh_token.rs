//! Refresh token entity - a persisted, single-use credential

use chrono::{DateTime, Utc};

use crate::value_objects::{ClientInfo, RefreshTokenId, UserId};

/// Refresh token row
///
/// Only a digest of the token is stored; the plain value exists solely in the
/// response that issued it. `revoked` and `revoked_at` always move together: a
/// revoked token carries the moment it was revoked, a live token carries none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub token_hash: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
}

impl RefreshToken {
    #[inline]
    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// A token expires at `expires_at` exactly
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Usable for a refresh: neither revoked nor expired
    #[inline]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }
}

/// Values for inserting a new refresh token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefreshToken {
    pub token_hash: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
}

impl NewRefreshToken {
    /// Build a token issued at `now` that lives for `ttl`
    pub fn issue(
        token_hash: impl Into<String>,
        user_id: UserId,
        now: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            token_hash: token_hash.into(),
            user_id,
            expires_at: now + ttl,
            created_at: now,
            device_info: None,
            ip_address: None,
        }
    }

    /// Record the client the token is handed to
    pub fn with_client(mut self, client: ClientInfo) -> Self {
        self.device_info = client.device_info;
        self.ip_address = client.ip_address;
        self
    }
}
