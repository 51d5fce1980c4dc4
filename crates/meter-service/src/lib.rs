//! # meter-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AccessService, AuthService, MeteringService, RetryPolicy, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};
