//! Domain entities - core business objects

mod customer;
mod identity;
mod user;

pub use customer::{Customer, WATTS_PER_UNIT};
pub use identity::{Identity, RequiredRole};
pub use user::{NewUser, Role, User};
