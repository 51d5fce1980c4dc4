//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod access;
pub mod auth;
pub mod context;
pub mod error;
pub mod metering;
pub mod retry;
pub mod user;

// Re-export all services for convenience
pub use access::AccessService;
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use metering::MeteringService;
pub use retry::RetryPolicy;
pub use user::UserService;
