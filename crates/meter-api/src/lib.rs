//! # meter-api
//!
//! REST API server for the prepaid metering service, built with Axum.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{bind, create_app, create_app_state, run, serve};
pub use state::AppState;
