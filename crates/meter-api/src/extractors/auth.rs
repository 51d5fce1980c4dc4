//! Authentication extractors
//!
//! Resolve the bearer token in the Authorization header to an identity and
//! enforce the route class: [`AdminUser`] for admin-only routes,
//! [`CustomerUser`] for customer-only routes.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use meter_core::{Customer, Identity, RequiredRole, User};
use meter_service::AccessService;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated administrator
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user: User,
}

/// Authenticated customer with its metering record as of this request
#[derive(Debug, Clone)]
pub struct CustomerUser {
    pub user: User,
    pub customer: Customer,
}

impl CustomerUser {
    pub fn identity(&self) -> Identity {
        Identity::Customer {
            user: self.user.clone(),
            customer: self.customer.clone(),
        }
    }
}

async fn authorize<S>(parts: &mut Parts, state: &S, required: RequiredRole) -> Result<Identity, ApiError>
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    // Extract the Authorization header
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::MissingAuth)?;

    let app_state = AppState::from_ref(state);
    let identity = AccessService::new(app_state.service_context())
        .authorize(bearer.token(), required)
        .await?;

    Ok(identity)
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match authorize(parts, state, RequiredRole::Admin).await? {
            Identity::Admin(user) => Ok(AdminUser { user }),
            Identity::Customer { .. } => Err(meter_service::ServiceError::forbidden().into()),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CustomerUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match authorize(parts, state, RequiredRole::Customer).await? {
            Identity::Customer { user, customer } => Ok(CustomerUser { user, customer }),
            Identity::Admin(_) => Err(meter_service::ServiceError::forbidden().into()),
        }
    }
}
