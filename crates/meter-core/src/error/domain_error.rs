//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{CustomerId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("No customer record for user {0}")]
    CustomerNotFoundForUser(UserId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Invalid tariff: {0}")]
    InvalidTariff(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User with same email already exists")]
    EmailAlreadyExists,

    #[error("Customer with same nic already exists")]
    NicNumberAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Transaction conflict, state changed concurrently")]
    TransactionConflict,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Build a field-level validation error
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::CustomerNotFound(_) | Self::CustomerNotFoundForUser(_) => "UNKNOWN_CUSTOMER",

            // Validation
            Self::ValidationError(_) | Self::InvalidField { .. } => "VALIDATION_ERROR",
            Self::InvalidTariff(_) => "INVALID_TARIFF",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::NicNumberAlreadyExists => "NIC_NUMBER_ALREADY_EXISTS",

            // Infrastructure
            Self::TransactionConflict => "TRANSACTION_CONFLICT",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::CustomerNotFound(_) | Self::CustomerNotFoundForUser(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidField { .. } | Self::InvalidTariff(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::NicNumberAlreadyExists)
    }

    /// Check if retrying against fresh state may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransactionConflict)
    }
}
