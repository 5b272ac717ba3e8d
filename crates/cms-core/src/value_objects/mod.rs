//! Value objects - immutable types that represent domain concepts

mod client_info;
mod ids;
mod role;

pub use client_info::{ClientInfo, MAX_DEVICE_INFO_LEN};
pub use ids::{IdParseError, RefreshTokenId, UserId};
pub use role::{AdminRole, RoleParseError};
