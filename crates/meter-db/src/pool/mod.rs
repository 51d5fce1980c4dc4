//! Database connection pool management

mod postgres;

pub use postgres::{apply_schema, create_pool, ping, DatabaseConfig};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
