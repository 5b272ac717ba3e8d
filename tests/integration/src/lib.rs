//! Integration test utilities for the site CMS backend
//!
//! Runs full authentication flows against a migrated in-memory SQLite
//! database with a manually driven clock.


pub use fixtures::*;
pub use helpers::*;
