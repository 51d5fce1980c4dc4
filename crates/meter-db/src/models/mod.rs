//! Database models - SQLx-compatible structs for PostgreSQL tables

mod customer;
mod user;

pub use customer::CustomerModel;
pub use user::UserModel;

