//! Opaque refresh token strings and the issued token pair

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Entropy per refresh token
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new opaque refresh token
///
/// 256 bits from the OS RNG, URL-safe base64 without padding (43 chars).
/// Uniqueness is additionally enforced by the `refresh_tokens.token_hash` index.
#[must_use]
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Digest under which a refresh token is stored and looked up
///
/// SHA-256, URL-safe base64 without padding. Deterministic so the presented
/// token can be matched with a single indexed query.
#[must_use]
pub fn hash_refresh_token(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

/// Access + refresh token pair handed to a client after login or rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    pub fn bearer(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        refresh_expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            refresh_expires_at,
        }
    }
}
