//! Route definitions
//!
//! Token issuance, admin-only user management and customer-only metering.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{auth, customers, health, users};
use crate::state::AppState;

/// Create the main API router (health routes are exported separately)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(customer_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Token routes
fn auth_routes() -> Router<AppState> {
    Router::new().route("/token", post(auth::login))
}

/// Admin-only user routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/all", get(users::list_users))
        .route("/users/all/admins", get(users::list_admins))
        .route("/users/all/customers", get(users::list_customers))
        .route("/users/admin", post(users::create_admin))
        .route("/users/customer", post(users::create_customer))
        .route("/users/customer/topup/:user_id", post(users::top_up))
        .route(
            "/users/:user_id",
            get(users::get_user).delete(users::delete_user),
        )
        .route("/users/:user_id/admin", put(users::update_admin))
        .route("/users/:user_id/customer", put(users::update_customer))
}

/// Customer-only routes
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customers/me", get(customers::me))
        .route(
            "/customers/should-get-service",
            get(customers::should_get_service),
        )
        .route("/customers/increase", post(customers::submit_reading))
        .route("/customers/bill", get(customers::bill))
}
