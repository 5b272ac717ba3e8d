//! Authentication service
//!
//! Issues access/refresh token pairs, rotates and revokes refresh tokens, and
//! resolves access tokens back to an admin identity.

use chrono::{DateTime, Utc};
use cms_common::auth::{
    dummy_verify_password, generate_refresh_token, hash_refresh_token, verify_password,
    TokenPair,
};
use cms_common::AppError;
use cms_core::entities::{AdminUser, NewRefreshToken, UserIdentity};
use cms_core::value_objects::{AdminRole, ClientInfo, RefreshTokenId, UserId};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{
    AdminUserResponse, AuthResponse, LoginRequest, RefreshTokenRequest, RevokeTokenRequest,
    SessionResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Login with username and password
    ///
    /// Unknown usernames and wrong passwords fail identically, and both pay
    /// for one Argon2 evaluation.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn authenticate(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;

        let Some(mut user) = self
            .ctx
            .admin_user_repo()
            .find_by_username(&request.username)
            .await?
        else {
            dummy_verify_password(&request.password);
            warn!("Login failed: unknown username");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        };

        let Some(password_hash) = self
            .ctx
            .admin_user_repo()
            .get_password_hash(user.id)
            .await?
        else {
            dummy_verify_password(&request.password);
            warn!(user_id = %user.id, "Login failed: no password hash");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        };

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        let now = self.ctx.now();
        let tokens = self.issue_for(&user, request.client_info(), now).await?;

        self.ctx
            .admin_user_repo()
            .touch_last_login(user.id, now)
            .await?;
        user.last_login = Some(now);

        info!(user_id = %user.id, "Admin logged in");

        Ok(AuthResponse::new(tokens, AdminUserResponse::from(&user)))
    }

    /// Validate an access token and return the identity it carries
    ///
    /// Pure token check; storage is not consulted.
    #[instrument(skip(self, token))]
    pub fn validate_access(&self, token: &str) -> ServiceResult<UserIdentity> {
        self.ctx
            .jwt_service()
            .validate_access_token(token, self.ctx.now())
            .map_err(ServiceError::from)
    }

    /// Exchange a live refresh token for a new pair
    ///
    /// The presented token is revoked and its replacement stored in one
    /// transaction; a token can be exchanged at most once.
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;
        let now = self.ctx.now();

        let stored = self
            .ctx
            .refresh_token_repo()
            .find_by_token_hash(&hash_refresh_token(&request.refresh_token))
            .await?
            .ok_or_else(|| {
                warn!("Refresh failed: unknown token");
                ServiceError::App(AppError::TokenNotFound)
            })?;

        if stored.is_revoked() {
            warn!(
                token_id = %stored.id,
                user_id = %stored.user_id,
                "Refresh failed: token already revoked"
            );
            return Err(ServiceError::App(AppError::TokenRevoked));
        }

        if stored.is_expired(now) {
            info!(token_id = %stored.id, "Refresh failed: token expired");
            return Err(ServiceError::App(AppError::TokenExpired));
        }

        let user = self
            .ctx
            .admin_user_repo()
            .find_by_id(stored.user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %stored.user_id, "Refresh failed: owner no longer exists");
                ServiceError::App(AppError::InvalidToken)
            })?;

        let refresh_token = generate_refresh_token();
        let replacement = NewRefreshToken::issue(
            hash_refresh_token(&refresh_token),
            user.id,
            now,
            self.ctx.refresh_token_ttl(),
        )
        .with_client(request.client_info());

        let rotated = self
            .ctx
            .refresh_token_repo()
            .rotate(stored.id, &replacement, now)
            .await?
            .ok_or_else(|| {
                warn!(token_id = %stored.id, "Refresh failed: lost rotation race");
                ServiceError::App(AppError::TokenRevoked)
            })?;

        let access = self
            .ctx
            .jwt_service()
            .issue_access_token(&UserIdentity::from(&user), now)?;

        info!(user_id = %user.id, token_id = %rotated.id, "Tokens refreshed");

        Ok(AuthResponse::new(
            TokenPair::bearer(
                access.token,
                refresh_token,
                self.ctx.jwt_service().access_token_expiry(),
                rotated.expires_at,
            ),
            AdminUserResponse::from(&user),
        ))
    }

    /// Logout: revoke one refresh token
    ///
    /// Revoking an already revoked token succeeds and keeps the original
    /// `revoked_at`.
    #[instrument(skip(self, request))]
    pub async fn revoke(&self, request: RevokeTokenRequest) -> ServiceResult<()> {
        request.validate()?;

        let stored = self
            .ctx
            .refresh_token_repo()
            .find_by_token_hash(&hash_refresh_token(&request.refresh_token))
            .await?
            .ok_or(ServiceError::App(AppError::TokenNotFound))?;

        self.revoke_stored(stored.id, stored.user_id).await
    }

    /// Revoke every live refresh token of a user
    #[instrument(skip(self))]
    pub async fn revoke_all(&self, user_id: UserId) -> ServiceResult<u64> {
        let revoked = self
            .ctx
            .refresh_token_repo()
            .revoke_all_for_user(user_id, self.ctx.now())
            .await?;

        info!(user_id = %user_id, revoked, "Revoked all sessions");
        Ok(revoked)
    }

    /// Active (unrevoked, unexpired) sessions of a user, newest first
    #[instrument(skip(self))]
    pub async fn list_sessions(&self, user_id: UserId) -> ServiceResult<Vec<SessionResponse>> {
        let now = self.ctx.now();
        let tokens = self
            .ctx
            .refresh_token_repo()
            .find_unrevoked_by_user(user_id)
            .await?;

        Ok(tokens
            .iter()
            .filter(|token| token.is_active(now))
            .map(SessionResponse::from)
            .collect())
    }

    /// Revoke a session by id
    ///
    /// Owners may revoke their own sessions; admins may revoke any.
    #[instrument(skip(self, actor), fields(actor_id = %actor.user_id))]
    pub async fn revoke_session(
        &self,
        actor: &UserIdentity,
        session_id: RefreshTokenId,
    ) -> ServiceResult<()> {
        let stored = self
            .ctx
            .refresh_token_repo()
            .find_by_id(session_id)
            .await?
            .ok_or(ServiceError::App(AppError::TokenNotFound))?;

        if stored.user_id != actor.user_id && !actor.role.is_admin() {
            warn!(owner_id = %stored.user_id, "Session revoke denied");
            return Err(ServiceError::permission_denied(AdminRole::Admin.as_str()));
        }

        self.revoke_stored(stored.id, stored.user_id).await
    }

    /// Resolve an access token to the stored admin account
    #[instrument(skip(self, token))]
    pub async fn current_user(&self, token: &str) -> ServiceResult<AdminUserResponse> {
        let identity = self.validate_access(token)?;

        let user = self
            .ctx
            .admin_user_repo()
            .find_by_id(identity.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Admin user", identity.user_id.to_string()))?;

        Ok(AdminUserResponse::from(&user))
    }

    /// Mint an access token and persist a fresh refresh token for `user`
    ///
    /// The plain refresh token only leaves through the returned pair.
    async fn issue_for(
        &self,
        user: &AdminUser,
        client: ClientInfo,
        now: DateTime<Utc>,
    ) -> ServiceResult<TokenPair> {
        let access = self
            .ctx
            .jwt_service()
            .issue_access_token(&UserIdentity::from(user), now)?;

        let refresh_token = generate_refresh_token();
        let stored = self
            .ctx
            .refresh_token_repo()
            .create(
                &NewRefreshToken::issue(
                    hash_refresh_token(&refresh_token),
                    user.id,
                    now,
                    self.ctx.refresh_token_ttl(),
                )
                .with_client(client),
            )
            .await?;

        Ok(TokenPair::bearer(
            access.token,
            refresh_token,
            self.ctx.jwt_service().access_token_expiry(),
            stored.expires_at,
        ))
    }

    async fn revoke_stored(&self, id: RefreshTokenId, user_id: UserId) -> ServiceResult<()> {
        let flipped = self
            .ctx
            .refresh_token_repo()
            .revoke(id, self.ctx.now())
            .await?;

        if flipped {
            info!(token_id = %id, user_id = %user_id, "Refresh token revoked");
        } else {
            debug!(token_id = %id, "Refresh token was already revoked");
        }

        Ok(())
    }
}
