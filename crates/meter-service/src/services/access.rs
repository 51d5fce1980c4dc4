//! Access control gate
//!
//! Turns a bearer token into an [`Identity`] and checks it against the route
//! class being called.

use meter_core::{Identity, RequiredRole, Role};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Access control service
pub struct AccessService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve the identity behind a bearer token
    ///
    /// Every failure is reported as `Unauthorized`; the cause is only logged.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<Identity> {
        let claims = self.ctx.jwt_service().decode_token(token)?;

        let Some(user) = self.ctx.user_repo().find_by_email(&claims.sub).await? else {
            warn!(subject = %claims.sub, "Token subject does not match any user");
            return Err(ServiceError::unauthorized());
        };

        match user.role {
            Role::Admin => Ok(Identity::Admin(user)),
            Role::Customer => {
                let Some(customer) = self.ctx.customer_repo().find_by_user(user.id).await? else {
                    warn!(user_id = %user.id, "Customer user has no metering record");
                    return Err(ServiceError::unauthorized());
                };
                Ok(Identity::Customer { user, customer })
            }
        }
    }

    /// Authenticate and require the given route class
    #[instrument(skip(self, token))]
    pub async fn authorize(&self, token: &str, required: RequiredRole) -> ServiceResult<Identity> {
        let identity = self.authenticate(token).await?;

        if !identity.satisfies(required) {
            debug!(user_id = %identity.user().id, "Identity does not satisfy route class");
            return Err(ServiceError::forbidden());
        }

        Ok(identity)
    }
}
