//! Service context - dependency container for services
//!
//! Holds the repositories, token primitives and clock needed by services.

use std::sync::Arc;

use chrono::Duration;
use cms_common::auth::JwtService;
use cms_common::{AppConfig, BootstrapConfig, MAX_TOKEN_EXPIRY_SECS};
use cms_core::traits::{AdminUserRepository, Clock, RefreshTokenRepository, SystemClock};
use cms_db::{SqliteAdminUserRepository, SqlitePool, SqliteRefreshTokenRepository};

use super::error::{ServiceError, ServiceResult};

/// Default refresh token lifetime (7 days)
const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 604_800;

/// Service context containing all dependencies
///
/// Passed explicitly to every service; there is no process-wide state.
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: SqlitePool,

    // Repositories
    admin_user_repo: Arc<dyn AdminUserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,

    // Token primitives
    jwt_service: Arc<JwtService>,
    refresh_token_ttl: Duration,

    // Time source for every expiry decision
    clock: Arc<dyn Clock>,

    bootstrap: BootstrapConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        pool: SqlitePool,
        admin_user_repo: Arc<dyn AdminUserRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        jwt_service: Arc<JwtService>,
        refresh_token_ttl: Duration,
        clock: Arc<dyn Clock>,
        bootstrap: BootstrapConfig,
    ) -> Self {
        Self {
            pool,
            admin_user_repo,
            refresh_token_repo,
            jwt_service,
            refresh_token_ttl,
            clock,
            bootstrap,
        }
    }

    /// Wire the SQLite repositories and wall clock from application config
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the refresh lifetime is out of range
    pub fn from_config(pool: SqlitePool, config: &AppConfig) -> ServiceResult<Self> {
        let refresh_token_ttl = refresh_ttl_from_secs(config.jwt.refresh_token_expiry)?;

        Ok(Self::new(
            pool.clone(),
            Arc::new(SqliteAdminUserRepository::new(pool.clone())),
            Arc::new(SqliteRefreshTokenRepository::new(pool)),
            Arc::new(JwtService::new(
                &config.jwt.secret,
                config.jwt.access_token_expiry,
            )),
            refresh_token_ttl,
            Arc::new(SystemClock),
            config.bootstrap.clone(),
        ))
    }

    // === Database Pool ===

    /// Get the SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // === Repositories ===

    /// Get the admin user repository
    pub fn admin_user_repo(&self) -> &dyn AdminUserRepository {
        self.admin_user_repo.as_ref()
    }

    /// Get the refresh token repository
    pub fn refresh_token_repo(&self) -> &dyn RefreshTokenRepository {
        self.refresh_token_repo.as_ref()
    }

    // === Tokens ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Lifetime of newly issued refresh tokens
    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }

    // === Time ===

    /// Current time according to the injected clock
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    // === Bootstrap ===

    /// Default administrative account settings
    pub fn bootstrap_config(&self) -> &BootstrapConfig {
        &self.bootstrap
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"SqlitePool")
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("bootstrap_username", &self.bootstrap.username)
            .finish_non_exhaustive()
    }
}

fn refresh_ttl_from_secs(secs: i64) -> ServiceResult<Duration> {
    if secs > MAX_TOKEN_EXPIRY_SECS {
        return Err(ServiceError::validation(format!(
            "refresh_token_ttl of {secs}s exceeds {MAX_TOKEN_EXPIRY_SECS}s"
        )));
    }
    Duration::try_seconds(secs).ok_or_else(|| {
        ServiceError::validation(format!("refresh_token_ttl of {secs}s is out of range"))
    })
}

/// Builder for creating ServiceContext with custom configuration
///
/// Repositories default to the SQLite implementations over `pool`, the clock
/// to `SystemClock`, the refresh lifetime to 7 days.
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<SqlitePool>,
    admin_user_repo: Option<Arc<dyn AdminUserRepository>>,
    refresh_token_repo: Option<Arc<dyn RefreshTokenRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    refresh_token_ttl: Option<Duration>,
    clock: Option<Arc<dyn Clock>>,
    bootstrap: Option<BootstrapConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: SqlitePool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn admin_user_repo(mut self, repo: Arc<dyn AdminUserRepository>) -> Self {
        self.admin_user_repo = Some(repo);
        self
    }

    pub fn refresh_token_repo(mut self, repo: Arc<dyn RefreshTokenRepository>) -> Self {
        self.refresh_token_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = Some(ttl);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn bootstrap(mut self, bootstrap: BootstrapConfig) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the pool or JWT service is
    /// missing, or the refresh lifetime is not positive or above the ceiling
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let pool = self
            .pool
            .ok_or_else(|| ServiceError::validation("pool is required"))?;
        let jwt_service = self
            .jwt_service
            .ok_or_else(|| ServiceError::validation("jwt_service is required"))?;

        let refresh_token_ttl = self
            .refresh_token_ttl
            .unwrap_or_else(|| Duration::seconds(DEFAULT_REFRESH_TOKEN_TTL_SECS));
        if refresh_token_ttl <= Duration::zero() {
            return Err(ServiceError::validation(
                "refresh_token_ttl must be positive",
            ));
        }
        if refresh_token_ttl > Duration::seconds(MAX_TOKEN_EXPIRY_SECS) {
            return Err(ServiceError::validation(format!(
                "refresh_token_ttl exceeds {MAX_TOKEN_EXPIRY_SECS}s"
            )));
        }

        let admin_user_repo = self
            .admin_user_repo
            .unwrap_or_else(|| Arc::new(SqliteAdminUserRepository::new(pool.clone())));
        let refresh_token_repo = self
            .refresh_token_repo
            .unwrap_or_else(|| Arc::new(SqliteRefreshTokenRepository::new(pool.clone())));

        Ok(ServiceContext::new(
            pool,
            admin_user_repo,
            refresh_token_repo,
            jwt_service,
            refresh_token_ttl,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.bootstrap.unwrap_or_default(),
        ))
    }
}
