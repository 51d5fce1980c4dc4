//! Customer handlers
//!
//! Customer-only endpoints operating on the caller's own metering record.

use axum::{extract::State, Json};
use meter_service::dto::{BillResponse, ReadingRequest, UserResponse};
use meter_service::{MeteringService, UserService};

use crate::extractors::{CustomerUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// The caller's user record with its customer embedded
///
/// GET /customers/me
pub async fn me(State(state): State<AppState>, caller: CustomerUser) -> Json<UserResponse> {
    let service = UserService::new(state.service_context());
    Json(service.me(&caller.identity()))
}

/// Whether the caller is currently allowed service
///
/// GET /customers/should-get-service
pub async fn should_get_service(
    State(state): State<AppState>,
    caller: CustomerUser,
) -> ApiResult<Json<bool>> {
    let service = MeteringService::new(state.service_context());
    Ok(Json(service.should_get_service(caller.customer.id).await?))
}

/// Submit a meter reading
///
/// POST /customers/increase
pub async fn submit_reading(
    State(state): State<AppState>,
    caller: CustomerUser,
    ValidatedJson(request): ValidatedJson<ReadingRequest>,
) -> ApiResult<Json<UserResponse>> {
    let reading = request.into_reading()?;

    let service = MeteringService::new(state.service_context());
    let customer = service.apply_reading(caller.customer.id, reading).await?;

    Ok(Json(UserResponse::from((caller.user, customer))))
}

/// Render the caller's bill at the current tariff
///
/// GET /customers/bill
pub async fn bill(
    State(state): State<AppState>,
    caller: CustomerUser,
) -> ApiResult<Json<BillResponse>> {
    let service = MeteringService::new(state.service_context());
    let message = service.generate_bill(caller.customer.id).await?;
    Ok(Json(BillResponse { message }))
}
