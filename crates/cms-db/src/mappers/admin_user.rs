//! Admin user entity <-> model mapper

use cms_core::entities::AdminUser;
use cms_core::error::DomainError;
use cms_core::value_objects::{AdminRole, UserId};

use crate::models::AdminUserModel;

/// Convert AdminUserModel to AdminUser entity
///
/// Fails only if the stored role is outside the known set.
impl TryFrom<AdminUserModel> for AdminUser {
    type Error = DomainError;

    fn try_from(model: AdminUserModel) -> Result<Self, Self::Error> {
        let role = model
            .role
            .parse::<AdminRole>()
            .map_err(|e| DomainError::InvalidRole(e.0))?;

        Ok(AdminUser {
            id: UserId::new(model.id),
            username: model.username,
            role,
            created_at: model.created_at,
            last_login: model.last_login,
        })
    }
}
