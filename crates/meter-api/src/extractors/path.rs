//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use meter_core::UserId;

use crate::response::ApiError;

/// `user_id` path segment parsed into a [`UserId`]
#[derive(Debug, Clone, Copy)]
pub struct UserIdPath(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        raw.parse()
            .map(UserIdPath)
            .map_err(|_| ApiError::invalid_path("Invalid user_id format"))
    }
}
