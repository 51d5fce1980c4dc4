//! User entity - a login that is either an administrator or a customer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Role of a user, persisted as an `is_admin` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    #[inline]
    pub fn from_is_admin(is_admin: bool) -> Self {
        if is_admin {
            Self::Admin
        } else {
            Self::Customer
        }
    }

    #[inline]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user is an administrator
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Update display name and email
    pub fn set_profile(&mut self, name: String, email: String) {
        self.name = name;
        self.email = email;
        self.updated_at = Utc::now();
    }
}

/// Fields required to create a user; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl NewUser {
    pub fn admin(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: Role::Admin,
        }
    }

    pub fn customer(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: Role::Customer,
        }
    }
}
