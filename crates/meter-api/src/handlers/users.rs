//! User management handlers
//!
//! Admin-only endpoints for listing, creating, updating and deleting users,
//! and for crediting customer balances.

use axum::{extract::State, Json};
use meter_core::UserFilter;
use meter_service::dto::{
    CreateAdminRequest, CreateCustomerRequest, DeletedResponse, TopUpRequest,
    UpdateAdminRequest, UpdateCustomerRequest, UserResponse,
};
use meter_service::{MeteringService, UserService};

use crate::extractors::{AdminUser, UserIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List every user
///
/// GET /users/all
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<UserResponse>>> {
    list(&state, UserFilter::All).await
}

/// List administrators
///
/// GET /users/all/admins
pub async fn list_admins(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<UserResponse>>> {
    list(&state, UserFilter::Admins).await
}

/// List customer users
///
/// GET /users/all/customers
pub async fn list_customers(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<UserResponse>>> {
    list(&state, UserFilter::Customers).await
}

async fn list(state: &AppState, filter: UserFilter) -> ApiResult<Json<Vec<UserResponse>>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.list(filter).await?))
}

/// Get user by ID
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    UserIdPath(user_id): UserIdPath,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.get(user_id).await?))
}

/// Create an administrator
///
/// POST /users/admin
pub async fn create_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<CreateAdminRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.create_admin(request).await?;
    Ok(Created(Json(response)))
}

/// Create a customer user and its metering record
///
/// POST /users/customer
pub async fn create_customer(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<CreateCustomerRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.create_customer(request).await?;
    Ok(Created(Json(response)))
}

/// Update a user's name and email
///
/// PUT /users/{user_id}/admin
pub async fn update_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    UserIdPath(user_id): UserIdPath,
    ValidatedJson(request): ValidatedJson<UpdateAdminRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.update_admin(user_id, request).await?))
}

/// Update a customer user's name, email and NIC number
///
/// PUT /users/{user_id}/customer
pub async fn update_customer(
    State(state): State<AppState>,
    _admin: AdminUser,
    UserIdPath(user_id): UserIdPath,
    ValidatedJson(request): ValidatedJson<UpdateCustomerRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.update_customer(user_id, request).await?))
}

/// Delete a user and the customer it owns
///
/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    UserIdPath(user_id): UserIdPath,
) -> ApiResult<Json<DeletedResponse>> {
    let service = UserService::new(state.service_context());
    service.delete(user_id).await?;
    Ok(Json(DeletedResponse::deleted()))
}

/// Credit the balance of the customer owned by a user
///
/// POST /users/customer/topup/{user_id}
pub async fn top_up(
    State(state): State<AppState>,
    _admin: AdminUser,
    UserIdPath(user_id): UserIdPath,
    ValidatedJson(request): ValidatedJson<TopUpRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::new(state.service_context())
        .get_user_entity(user_id)
        .await?;

    let service = MeteringService::new(state.service_context());
    let customer = service.apply_top_up_for_user(user.id, request.amount).await?;

    Ok(Json(UserResponse::from((user, customer))))
}
