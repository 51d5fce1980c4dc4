//! Resolved caller identity

use super::{Customer, User};

/// The identity behind a verified bearer token
///
/// Resolved once per request; customers always carry their metering record.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Admin(User),
    Customer { user: User, customer: Customer },
}

/// Route class a caller must belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    Admin,
    Customer,
}

impl Identity {
    #[inline]
    pub fn user(&self) -> &User {
        match self {
            Self::Admin(user) => user,
            Self::Customer { user, .. } => user,
        }
    }

    #[inline]
    pub fn customer(&self) -> Option<&Customer> {
        match self {
            Self::Admin(_) => None,
            Self::Customer { customer, .. } => Some(customer),
        }
    }

    pub fn satisfies(&self, required: RequiredRole) -> bool {
        matches!(
            (self, required),
            (Self::Admin(_), RequiredRole::Admin) | (Self::Customer { .. }, RequiredRole::Customer)
        )
    }
}
