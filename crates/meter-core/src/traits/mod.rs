//! Repository traits (ports)

mod repositories;

pub use repositories::{CustomerMutation, CustomerRepository, RepoResult, UserFilter, UserRepository};
