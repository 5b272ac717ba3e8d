//! Refresh token entity <-> model mapper

use cms_core::entities::RefreshToken;
use cms_core::value_objects::{RefreshTokenId, UserId};

use crate::models::RefreshTokenModel;

/// Convert RefreshTokenModel to RefreshToken entity
impl From<RefreshTokenModel> for RefreshToken {
    fn from(model: RefreshTokenModel) -> Self {
        RefreshToken {
            id: RefreshTokenId::new(model.id),
            token_hash: model.token_hash,
            user_id: UserId::new(model.user_id),
            expires_at: model.expires_at,
            created_at: model.created_at,
            revoked: model.revoked,
            revoked_at: model.revoked_at,
            device_info: model.device_info,
            ip_address: model.ip_address,
        }
    }
}
