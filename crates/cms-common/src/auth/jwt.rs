//! Access token encoding and verification
//!
//! Access tokens are HS256 JWTs signed with the configured secret. Expiry is
//! checked against the caller's clock rather than the library's wall clock so
//! that the whole token lifecycle runs on one injectable time source.

use chrono::{DateTime, Duration, Utc};
use cms_core::{AdminRole, UserId, UserIdentity};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin user ID)
    pub sub: String,
    pub username: String,
    pub role: AdminRole,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Get the subject as a user ID
    ///
    /// # Errors
    /// Returns `AppError::InvalidToken` if the subject is not numeric
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.sub.parse::<UserId>().map_err(|_| AppError::InvalidToken)
    }

    /// Build the identity this token proves
    pub fn identity(&self) -> Result<UserIdentity, AppError> {
        Ok(UserIdentity {
            user_id: self.user_id()?,
            username: self.username.clone(),
            role: self.role,
        })
    }

    /// Expired once `now` reaches `exp`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// A signed access token and the moment it stops being accepted
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT service for encoding and decoding access tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and access token lifetime (seconds)
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is compared against the injected clock in `decode_token`
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_expiry,
        }
    }

    /// Access token lifetime in seconds
    #[must_use]
    pub fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    /// Sign an access token for `identity`, issued at `now`
    ///
    /// # Errors
    /// `AppError::Config` if the configured lifetime does not fit a timestamp,
    /// otherwise an error if token encoding fails
    pub fn issue_access_token(
        &self,
        identity: &UserIdentity,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AppError> {
        let expires_at = Duration::try_seconds(self.access_token_expiry)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "access token expiry of {}s is out of range",
                    self.access_token_expiry
                ))
            })?;

        let claims = Claims {
            sub: identity.user_id.to_string(),
            username: identity.username.clone(),
            role: identity.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode JWT: {e}")))?;

        Ok(AccessToken { token, expires_at })
    }

    /// Verify the signature of a token and check its expiry against `now`
    ///
    /// # Errors
    /// `AppError::InvalidToken` for malformed tokens or bad signatures,
    /// `AppError::TokenExpired` once `now` has reached `exp`
    pub fn decode_token(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })?;

        if token_data.claims.is_expired_at(now) {
            return Err(AppError::TokenExpired);
        }

        Ok(token_data.claims)
    }

    /// Validate an access token and return the identity it carries
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn validate_access_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserIdentity, AppError> {
        self.decode_token(token, now)?.identity()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish_non_exhaustive()
    }
}
