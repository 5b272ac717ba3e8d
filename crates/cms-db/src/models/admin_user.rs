//! Admin user database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for admin_users table
#[derive(Debug, Clone, FromRow)]
pub struct AdminUserModel {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}
