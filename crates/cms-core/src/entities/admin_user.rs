//! Admin user entity - an account allowed into the content admin

use chrono::{DateTime, Utc};

use crate::value_objects::{AdminRole, UserId};

/// Admin account
///
/// The password hash is deliberately not part of the entity; it is only read
/// through `AdminUserRepository::get_password_hash` when verifying a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub id: UserId,
    pub username: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl AdminUser {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Values for inserting a new admin account (id is assigned by the database)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdminUser {
    pub username: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
}

impl NewAdminUser {
    pub fn new(username: impl Into<String>, role: AdminRole, created_at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            role,
            created_at,
        }
    }
}
