//! Identity proven by a valid access token

use serde::{Deserialize, Serialize};

use crate::entities::AdminUser;
use crate::value_objects::{AdminRole, UserId};

/// Who the bearer of an access token is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: UserId,
    pub username: String,
    pub role: AdminRole,
}

impl From<&AdminUser> for UserIdentity {
    fn from(user: &AdminUser) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}
