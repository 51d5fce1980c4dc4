//! Authentication handlers
//!
//! Token issuance for the OAuth2 password flow.

use axum::{extract::State, Json};
use meter_common::AccessToken;
use meter_service::{dto::LoginForm, AuthService};

use crate::extractors::FormBody;
use crate::response::ApiResult;
use crate::state::AppState;

/// Exchange email and password for a bearer token
///
/// POST /token
pub async fn login(
    State(state): State<AppState>,
    FormBody(form): FormBody<LoginForm>,
) -> ApiResult<Json<AccessToken>> {
    let service = AuthService::new(state.service_context());
    let token = service.login(form).await?;
    Ok(Json(token))
}
