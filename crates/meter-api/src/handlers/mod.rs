//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod customers;
pub mod health;
pub mod users;
