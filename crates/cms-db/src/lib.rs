//! # cms-db
//!
//! Database layer implementing repository traits with SQLite via SQLx.
//!
//! ## Overview
//!
//! This crate provides SQLite implementations for the repository traits
//! defined in `cms-core`. It handles:
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Model to entity mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cms_db::pool::{create_pool, run_migrations, PoolConfig};
//! use cms_db::repositories::SqliteAdminUserRepository;
//! use cms_core::traits::AdminUserRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let users = SqliteAdminUserRepository::new(pool);
//!
//!     let admin = users.find_by_username("admin").await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PoolConfig, SqlitePool};
pub use repositories::{SqliteAdminUserRepository, SqliteRefreshTokenRepository};
