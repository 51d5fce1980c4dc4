//! User service
//!
//! Handles administrator-facing user management and the customer's own view.

use meter_common::auth::hash_password;
use meter_common::BootstrapAdminConfig;
use meter_core::entities::{Identity, NewUser, User};
use meter_core::{UserFilter, UserId};
use tracing::{info, instrument};

use crate::dto::{
    CreateAdminRequest, CreateCustomerRequest, UpdateAdminRequest, UpdateCustomerRequest,
    UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List users ordered by id, customers with their metering record
    #[instrument(skip(self))]
    pub async fn list(&self, filter: UserFilter) -> ServiceResult<Vec<UserResponse>> {
        let users = self.ctx.user_repo().list(filter).await?;

        let mut responses = Vec::with_capacity(users.len());
        for user in &users {
            responses.push(self.to_response(user).await?);
        }
        Ok(responses)
    }

    /// Get user by ID
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: UserId) -> ServiceResult<UserResponse> {
        let user = self.get_user_entity(user_id).await?;
        self.to_response(&user).await
    }

    /// Get user entity by ID
    #[instrument(skip(self))]
    pub async fn get_user_entity(&self, user_id: UserId) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))
    }

    /// The caller's own record
    pub fn me(&self, identity: &Identity) -> UserResponse {
        UserResponse::from(identity)
    }

    /// Create an administrator
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_admin(&self, request: CreateAdminRequest) -> ServiceResult<UserResponse> {
        let password_hash = hash_password(&request.password)?;

        let user = self
            .ctx
            .user_repo()
            .create_admin(&NewUser::admin(request.name, request.email), &password_hash)
            .await?;

        info!(user_id = %user.id, "Administrator created");
        Ok(UserResponse::from(&user))
    }

    /// Create a customer user together with its metering record
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> ServiceResult<UserResponse> {
        let password_hash = hash_password(&request.password)?;

        let (user, customer) = self
            .ctx
            .user_repo()
            .create_customer(
                &NewUser::customer(request.name, request.email),
                &password_hash,
                &request.customer.nic_number,
            )
            .await?;

        info!(user_id = %user.id, customer_id = %customer.id, "Customer created");
        Ok(UserResponse::from((user, customer)))
    }

    /// Update any user's name and email
    #[instrument(skip(self, request))]
    pub async fn update_admin(
        &self,
        user_id: UserId,
        request: UpdateAdminRequest,
    ) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .update_profile(user_id, &request.name, &request.email)
            .await?;

        info!(user_id = %user.id, "User updated");
        self.to_response(&user).await
    }

    /// Update a customer user's name, email and NIC number
    #[instrument(skip(self, request))]
    pub async fn update_customer(
        &self,
        user_id: UserId,
        request: UpdateCustomerRequest,
    ) -> ServiceResult<UserResponse> {
        let (user, customer) = self
            .ctx
            .user_repo()
            .update_customer_profile(
                user_id,
                &request.name,
                &request.email,
                &request.customer.nic_number,
            )
            .await?;

        info!(user_id = %user.id, customer_id = %customer.id, "Customer updated");
        Ok(UserResponse::from((user, customer)))
    }

    /// Delete a user and the customer it owns
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: UserId) -> ServiceResult<()> {
        self.ctx.user_repo().delete(user_id).await?;
        info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    /// Create the configured administrator unless its email is already taken
    ///
    /// Returns whether a user was created.
    #[instrument(skip_all, fields(email = %config.email))]
    pub async fn ensure_bootstrap_admin(&self, config: &BootstrapAdminConfig) -> ServiceResult<bool> {
        if self
            .ctx
            .user_repo()
            .find_by_email(&config.email)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let password_hash = hash_password(&config.password)?;
        let user = self
            .ctx
            .user_repo()
            .create_admin(
                &NewUser::admin(config.name.clone(), config.email.clone()),
                &password_hash,
            )
            .await?;

        info!(user_id = %user.id, "Bootstrap administrator created");
        Ok(true)
    }

    async fn to_response(&self, user: &User) -> ServiceResult<UserResponse> {
        if user.is_admin() {
            return Ok(UserResponse::from(user));
        }

        let customer = self.ctx.customer_repo().find_by_user(user.id).await?;
        Ok(UserResponse::with_customer(user, customer.as_ref()))
    }
}
