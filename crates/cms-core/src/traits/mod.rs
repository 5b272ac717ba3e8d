//! Ports implemented by the infrastructure layer

mod clock;
mod repositories;

pub use clock::{Clock, SystemClock};
pub use repositories::{AdminUserRepository, RefreshTokenRepository, RepoResult};
