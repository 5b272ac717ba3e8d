//! Row identifiers
//!
//! SQLite assigns `INTEGER PRIMARY KEY` values on insert, so identifiers are
//! plain `i64` wrapped in newtypes to keep users and tokens from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generates a transparent `i64` identifier newtype.
macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw row id
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self).map_err(|_| IdParseError::InvalidFormat)
            }
        }
    };
}

row_id!(
    /// Primary key of an `admin_users` row
    UserId
);

row_id!(
    /// Primary key of a `refresh_tokens` row
    RefreshTokenId
);

/// Error when parsing an identifier from a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid id format")]
    InvalidFormat,
}
