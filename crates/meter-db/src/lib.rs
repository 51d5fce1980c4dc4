//! # meter-db
//!
//! Storage layer implementing the meter-core repository traits.
//!
//! ## Overview
//!
//! - PostgreSQL repositories via SQLx, with row-locked read-modify-write for
//!   customer mutations and single-transaction cascades
//! - Database models with SQLx `FromRow` derives and entity mappers
//! - Connection pool management and idempotent schema application
//! - An in-process store with the same guarantees, for tests and local runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meter_db::pool::{apply_schema, create_pool, DatabaseConfig};
//! use meter_db::repositories::PgUserRepository;
//! use meter_core::traits::UserRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new("postgres://localhost/meter", 20, 5);
//!     let pool = create_pool(&config).await?;
//!     apply_schema(&pool).await?;
//!     let user_repo = PgUserRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemoryCustomerRepository, MemoryStore, MemoryUserRepository};
pub use pool::{apply_schema, create_pool, ping, DatabaseConfig, PgPool};
pub use repositories::{PgCustomerRepository, PgUserRepository};
