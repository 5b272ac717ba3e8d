//! SQLite implementation of RefreshTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use cms_core::entities::{NewRefreshToken, RefreshToken};
use cms_core::error::DomainError;
use cms_core::traits::{RefreshTokenRepository, RepoResult};
use cms_core::value_objects::{RefreshTokenId, UserId};

use crate::models::RefreshTokenModel;

use super::error::{map_db_error, map_unique_violation};

/// SQLite implementation of RefreshTokenRepository
#[derive(Clone)]
pub struct SqliteRefreshTokenRepository {
    pool: SqlitePool,
}

impl SqliteRefreshTokenRepository {
    /// Create a new SqliteRefreshTokenRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for SqliteRefreshTokenRepository {
    #[instrument(skip(self, token_hash))]
    async fn find_by_token_hash(&self, token_hash: &str) -> RepoResult<Option<RefreshToken>> {
        let result = sqlx::query_as::<_, RefreshTokenModel>(
            r"
            SELECT id, token_hash, user_id, expires_at, created_at, revoked, revoked_at,
                   device_info, ip_address
            FROM refresh_tokens
            WHERE token_hash = ?
            ",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RefreshToken::from))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RefreshTokenId) -> RepoResult<Option<RefreshToken>> {
        let result = sqlx::query_as::<_, RefreshTokenModel>(
            r"
            SELECT id, token_hash, user_id, expires_at, created_at, revoked, revoked_at,
                   device_info, ip_address
            FROM refresh_tokens
            WHERE id = ?
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RefreshToken::from))
    }

    #[instrument(skip(self, token), fields(user_id = %token.user_id))]
    async fn create(&self, token: &NewRefreshToken) -> RepoResult<RefreshToken> {
        let model = sqlx::query_as::<_, RefreshTokenModel>(
            r"
            INSERT INTO refresh_tokens
                (token_hash, user_id, expires_at, created_at, revoked, device_info, ip_address)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            RETURNING id, token_hash, user_id, expires_at, created_at, revoked, revoked_at,
                      device_info, ip_address
            ",
        )
        .bind(&token.token_hash)
        .bind(token.user_id.into_inner())
        .bind(token.expires_at)
        .bind(token.created_at)
        .bind(&token.device_info)
        .bind(&token.ip_address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::TokenAlreadyExists))?;

        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn revoke(&self, id: RefreshTokenId, at: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE refresh_tokens
            SET revoked = 1, revoked_at = ?
            WHERE id = ? AND revoked = 0
            ",
        )
        .bind(at)
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self, replacement), fields(user_id = %replacement.user_id))]
    async fn rotate(
        &self,
        old: RefreshTokenId,
        replacement: &NewRefreshToken,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<RefreshToken>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let revoked = sqlx::query(
            r"
            UPDATE refresh_tokens
            SET revoked = 1, revoked_at = ?
            WHERE id = ? AND revoked = 0
            ",
        )
        .bind(at)
        .bind(old.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if revoked.rows_affected() == 0 {
            tx.rollback().await.map_err(map_db_error)?;
            debug!(token_id = %old, "Rotation lost: token already revoked");
            return Ok(None);
        }

        let model = sqlx::query_as::<_, RefreshTokenModel>(
            r"
            INSERT INTO refresh_tokens
                (token_hash, user_id, expires_at, created_at, revoked, device_info, ip_address)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            RETURNING id, token_hash, user_id, expires_at, created_at, revoked, revoked_at,
                      device_info, ip_address
            ",
        )
        .bind(&replacement.token_hash)
        .bind(replacement.user_id.into_inner())
        .bind(replacement.expires_at)
        .bind(replacement.created_at)
        .bind(&replacement.device_info)
        .bind(&replacement.ip_address)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::TokenAlreadyExists))?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Some(model.into()))
    }

    #[instrument(skip(self))]
    async fn revoke_all_for_user(&self, user_id: UserId, at: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE refresh_tokens
            SET revoked = 1, revoked_at = ?
            WHERE user_id = ? AND revoked = 0
            ",
        )
        .bind(at)
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn find_unrevoked_by_user(&self, user_id: UserId) -> RepoResult<Vec<RefreshToken>> {
        let rows = sqlx::query_as::<_, RefreshTokenModel>(
            r"
            SELECT id, token_hash, user_id, expires_at, created_at, revoked, revoked_at,
                   device_info, ip_address
            FROM refresh_tokens
            WHERE user_id = ? AND revoked = 0
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(RefreshToken::from).collect())
    }
}
