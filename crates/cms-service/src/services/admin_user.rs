//! Admin account management
//!
//! Bootstrap of the default account, creation of further accounts by an
//! administrator, and operator password resets.

use cms_common::auth::{hash_password, validate_password_strength};
use cms_core::entities::{AdminUser, NewAdminUser, UserIdentity};
use cms_core::error::DomainError;
use cms_core::value_objects::AdminRole;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{AdminUserResponse, CreateAdminUserRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Result of `AdminUserService::bootstrap`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The default account did not exist and was created
    Created(AdminUser),
    /// An account with the bootstrap username already exists; left untouched
    AlreadyPresent(AdminUser),
}

impl BootstrapOutcome {
    pub fn user(&self) -> &AdminUser {
        match self {
            Self::Created(user) | Self::AlreadyPresent(user) => user,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Admin account service
pub struct AdminUserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminUserService<'a> {
    /// Create a new AdminUserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create the default administrative account if it is absent
    ///
    /// An existing account keeps its password.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> ServiceResult<BootstrapOutcome> {
        let config = self.ctx.bootstrap_config();
        let repo = self.ctx.admin_user_repo();

        if let Some(existing) = repo.find_by_username(&config.username).await? {
            info!(user_id = %existing.id, "Bootstrap account already present");
            return Ok(BootstrapOutcome::AlreadyPresent(existing));
        }

        let password_hash = hash_password(&config.password)?;
        let new_user = NewAdminUser::new(&config.username, AdminRole::Admin, self.ctx.now());

        match repo.create(&new_user, &password_hash).await {
            Ok(user) => {
                warn!(
                    user_id = %user.id,
                    username = %user.username,
                    "Created bootstrap admin account; change its password"
                );
                Ok(BootstrapOutcome::Created(user))
            }
            // another process bootstrapped between the lookup and the insert
            Err(DomainError::UsernameAlreadyExists(_)) => repo
                .find_by_username(&config.username)
                .await?
                .map(BootstrapOutcome::AlreadyPresent)
                .ok_or_else(|| ServiceError::internal("bootstrap account vanished")),
            Err(e) => Err(e.into()),
        }
    }

    /// Create a new admin account; `actor` must hold the admin role
    #[instrument(skip(self, actor, request), fields(actor_id = %actor.user_id, username = %request.username))]
    pub async fn create_user(
        &self,
        actor: &UserIdentity,
        request: CreateAdminUserRequest,
    ) -> ServiceResult<AdminUserResponse> {
        if !actor.role.is_admin() {
            warn!("Account creation denied: actor is not an admin");
            return Err(ServiceError::permission_denied(AdminRole::Admin.as_str()));
        }

        request.validate()?;
        validate_password_strength(&request.password)?;

        let repo = self.ctx.admin_user_repo();
        if repo.username_exists(&request.username).await? {
            return Err(ServiceError::conflict(format!(
                "Username already taken: {}",
                request.username
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let user = repo
            .create(
                &NewAdminUser::new(request.username, request.role, self.ctx.now()),
                &password_hash,
            )
            .await
            .map_err(|e| match e {
                DomainError::UsernameAlreadyExists(name) => {
                    ServiceError::conflict(format!("Username already taken: {name}"))
                }
                other => other.into(),
            })?;

        info!(user_id = %user.id, role = %user.role, "Admin account created");
        Ok(AdminUserResponse::from(&user))
    }

    /// Operator password reset
    ///
    /// Every refresh token of the account is revoked; returns how many were.
    #[instrument(skip(self, new_password))]
    pub async fn reset_password(&self, username: &str, new_password: &str) -> ServiceResult<u64> {
        validate_password_strength(new_password)?;

        let user = self
            .ctx
            .admin_user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("Admin user", username))?;

        let password_hash = hash_password(new_password)?;
        self.ctx
            .admin_user_repo()
            .update_password(user.id, &password_hash)
            .await?;

        let revoked = self
            .ctx
            .refresh_token_repo()
            .revoke_all_for_user(user.id, self.ctx.now())
            .await?;

        info!(user_id = %user.id, revoked, "Password reset");
        Ok(revoked)
    }
}
