//! Error handling utilities for repositories

use meter_core::error::DomainError;
use meter_core::value_objects::{CustomerId, UserId};
use sqlx::Error as SqlxError;

/// SQLSTATE codes worth retrying against fresh state
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Unique constraint names from `schema/schema.sql`
const USERS_EMAIL_KEY: &str = "users_email_key";
const CUSTOMERS_NIC_NUMBER_KEY: &str = "customers_nic_number_key";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if matches!(
            db_err.code().as_deref(),
            Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
        ) {
            return DomainError::TransactionConflict;
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Classify unique violations by constraint, falling back to `map_db_error`
pub fn map_write_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(USERS_EMAIL_KEY) => return DomainError::EmailAlreadyExists,
                Some(CUSTOMERS_NIC_NUMBER_KEY) => return DomainError::NicNumberAlreadyExists,
                _ => {}
            }
        }
    }
    map_db_error(e)
}

/// Create a "user not found" error
pub fn user_not_found(id: UserId) -> DomainError {
    DomainError::UserNotFound(id)
}

/// Create a "customer not found" error
pub fn customer_not_found(id: CustomerId) -> DomainError {
    DomainError::CustomerNotFound(id)
}
