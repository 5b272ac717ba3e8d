//! Authentication primitives

mod bearer;
mod jwt;
mod password;
mod tokens;

pub use bearer::bearer_token;
pub use jwt::{AccessToken, Claims, JwtService};
pub use password::{
    dummy_verify_password, hash_password, validate_password_strength, verify_password,
    MIN_PASSWORD_LENGTH,
};
pub use tokens::{generate_refresh_token, hash_refresh_token, TokenPair, REFRESH_TOKEN_BYTES};
