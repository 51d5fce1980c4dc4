//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in meter-core.
//! Each repository handles database operations for a specific domain entity.

mod customer;
mod error;
mod user;

pub use customer::PgCustomerRepository;
pub use user::PgUserRepository;
