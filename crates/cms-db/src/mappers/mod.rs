//! Entity to model mappers
//!
//! Conversions from database rows (models) to domain entities (cms-core).

mod admin_user;
mod refresh_token;
