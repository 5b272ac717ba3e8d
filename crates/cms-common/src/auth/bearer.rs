//! `Authorization: Bearer <token>` parsing

use crate::error::AppError;

/// Extract the token from an `Authorization` header value
///
/// The scheme is matched case-insensitively; surrounding whitespace is ignored.
///
/// # Errors
/// `AppError::MissingAuth` when the header is not a non-empty bearer credential
pub fn bearer_token(header_value: &str) -> Result<&str, AppError> {
    let value = header_value.trim();
    let (scheme, token) = value.split_once(' ').ok_or(AppError::MissingAuth)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::MissingAuth);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::MissingAuth);
    }

    Ok(token)
}
