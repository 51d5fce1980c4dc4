//! User entity <-> model mapper

use meter_core::entities::{Role, User};
use meter_core::value_objects::UserId;

use crate::models::UserModel;

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: UserId::new(model.id),
            name: model.name,
            email: model.email,
            role: Role::from_is_admin(model.is_admin),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
