//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{AdminUser, NewAdminUser, NewRefreshToken, RefreshToken};
use crate::error::DomainError;
use crate::value_objects::{RefreshTokenId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Admin User Repository
// ============================================================================

#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    /// Find admin by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<AdminUser>>;

    /// Find admin by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<AdminUser>>;

    /// Check if a username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Insert a new admin and return the stored row
    async fn create(&self, user: &NewAdminUser, password_hash: &str) -> RepoResult<AdminUser>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>>;

    /// Replace the password hash
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()>;

    /// Record a successful login
    async fn touch_last_login(&self, id: UserId, at: DateTime<Utc>) -> RepoResult<()>;
}

// ============================================================================
// Refresh Token Repository
// ============================================================================

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Find a token row by the digest of its opaque string, revoked or not
    async fn find_by_token_hash(&self, token_hash: &str) -> RepoResult<Option<RefreshToken>>;

    /// Find a token row by ID
    async fn find_by_id(&self, id: RefreshTokenId) -> RepoResult<Option<RefreshToken>>;

    /// Persist a freshly issued token
    async fn create(&self, token: &NewRefreshToken) -> RepoResult<RefreshToken>;

    /// Revoke a token if it is still live.
    ///
    /// Returns `true` when this call flipped the flag, `false` when the token
    /// was already revoked (its `revoked_at` is left untouched).
    async fn revoke(&self, id: RefreshTokenId, at: DateTime<Utc>) -> RepoResult<bool>;

    /// Revoke `old` and insert `replacement` in one transaction.
    ///
    /// The revoke is a compare-and-set on the live flag: if another caller
    /// revoked `old` first, nothing is written and `None` is returned.
    async fn rotate(
        &self,
        old: RefreshTokenId,
        replacement: &NewRefreshToken,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<RefreshToken>>;

    /// Revoke every live token of a user, returning how many were revoked
    async fn revoke_all_for_user(&self, user_id: UserId, at: DateTime<Utc>) -> RepoResult<u64>;

    /// List the user's tokens that have not been revoked (expired ones included)
    async fn find_unrevoked_by_user(&self, user_id: UserId) -> RepoResult<Vec<RefreshToken>>;
}
