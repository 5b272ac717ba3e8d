//! SQLite implementation of AdminUserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use cms_core::entities::{AdminUser, NewAdminUser};
use cms_core::error::DomainError;
use cms_core::traits::{AdminUserRepository, RepoResult};
use cms_core::value_objects::UserId;

use crate::models::AdminUserModel;

use super::error::{map_db_error, map_unique_violation, user_not_found};

/// SQLite implementation of AdminUserRepository
#[derive(Clone)]
pub struct SqliteAdminUserRepository {
    pool: SqlitePool,
}

impl SqliteAdminUserRepository {
    /// Create a new SqliteAdminUserRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminUserRepository for SqliteAdminUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<AdminUser>> {
        let result = sqlx::query_as::<_, AdminUserModel>(
            r"
            SELECT id, username, role, created_at, last_login
            FROM admin_users
            WHERE id = ?
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(AdminUser::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<AdminUser>> {
        let result = sqlx::query_as::<_, AdminUserModel>(
            r"
            SELECT id, username, role, created_at, last_login
            FROM admin_users
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(AdminUser::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM admin_users WHERE username = ?)
            ",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, password_hash))]
    async fn create(&self, user: &NewAdminUser, password_hash: &str) -> RepoResult<AdminUser> {
        let model = sqlx::query_as::<_, AdminUserModel>(
            r"
            INSERT INTO admin_users (username, password_hash, role, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, role, created_at, last_login
            ",
        )
        .bind(&user.username)
        .bind(password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::UsernameAlreadyExists(user.username.clone())
            })
        })?;

        AdminUser::try_from(model)
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM admin_users WHERE id = ?
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE admin_users SET password_hash = ? WHERE id = ?
            ",
        )
        .bind(password_hash)
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn touch_last_login(&self, id: UserId, at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE admin_users SET last_login = ? WHERE id = ?
            ",
        )
        .bind(at)
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }
}
