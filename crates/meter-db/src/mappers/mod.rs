//! Entity to model mappers
//!
//! This module provides conversions between domain entities (meter-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Update` structs: Prepare entity data for database writes

mod customer;
mod user;

pub use customer::CustomerUpdate;
