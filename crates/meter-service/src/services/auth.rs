//! Authentication service
//!
//! Handles token issuance against stored credentials.

use meter_common::auth::{verify_password, AccessToken};
use meter_common::AppError;
use tracing::{info, instrument, warn};

use crate::dto::LoginForm;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Login with email and password
    ///
    /// An unknown email and a wrong password are indistinguishable to the caller.
    #[instrument(skip(self, form), fields(email = %form.username))]
    pub async fn login(&self, form: LoginForm) -> ServiceResult<AccessToken> {
        // Find user by email
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&form.username)
            .await?
            .ok_or_else(|| {
                warn!(email = %form.username, "Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        // Get password hash
        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        // Verify password
        let is_valid = verify_password(&form.password, &password_hash)?;

        if !is_valid {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        info!(user_id = %user.id, "User logged in successfully");

        Ok(self.ctx.jwt_service().issue(&user.email)?)
    }
}
