//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use meter_core::{validate_email_address, validate_nic_number, MeterReading};
use serde::Deserialize;
use validator::Validate;

use crate::services::ServiceResult;

// ============================================================================
// Auth Requests
// ============================================================================

/// OAuth2 password grant form; `username` carries the email
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// ============================================================================
// User Requests
// ============================================================================

/// Create administrator request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Customer-specific fields nested in user requests
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerFields {
    #[validate(custom(function = "validate_nic_number"))]
    pub nic_number: String,
}

/// Create customer user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,

    #[validate(nested)]
    pub customer: CustomerFields,
}

/// Update administrator request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAdminRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
}

/// Update customer user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[validate(nested)]
    pub customer: CustomerFields,
}

// ============================================================================
// Metering Requests
// ============================================================================

/// Balance credit request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TopUpRequest {
    #[serde(alias = "account_balance_in_rupees")]
    #[validate(range(min = 0.0, message = "Amount must not be negative"))]
    pub amount: f64,
}

/// Meter reading submitted by a customer
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReadingRequest {
    #[validate(range(min = 0.0, message = "Watts consumed must not be negative"))]
    pub watts_consumed: f64,

    #[validate(range(exclusive_min = 0.0, message = "Voltage must be greater than zero"))]
    pub voltage: f64,

    #[validate(range(exclusive_min = 0.0, message = "Current must be greater than zero"))]
    pub current: f64,
}

impl ReadingRequest {
    /// Convert into a domain reading, applying the domain's own checks
    pub fn into_reading(self) -> ServiceResult<MeterReading> {
        Ok(MeterReading::new(self.watts_consumed, self.voltage, self.current)?)
    }
}
