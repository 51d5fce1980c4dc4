//! Test fixtures and data generators

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique suffix for test data
pub fn unique_suffix() -> String {
    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() % 100_000)
        .unwrap_or(0);
    format!("{}{}", timestamp, count)
}

/// Generate a unique email address
pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, unique_suffix())
}

/// Generate a unique 13-digit NIC number
pub fn unique_nic_number() -> String {
    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() % 10_000_000)
        .unwrap_or(0);
    format!("{:07}{:06}", timestamp, count % 1_000_000)
}

// ============================================================================
// Request fixtures
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreateAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateAdminRequest {
    pub fn unique() -> Self {
        Self {
            name: "Operator".to_string(),
            email: unique_email("admin"),
            password: "admin-secret".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerFields {
    pub nic_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub customer: CustomerFields,
}

impl CreateCustomerRequest {
    pub fn unique() -> Self {
        Self {
            name: "Customer".to_string(),
            email: unique_email("customer"),
            password: "customer-secret".to_string(),
            customer: CustomerFields {
                nic_number: unique_nic_number(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateAdminRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateCustomerRequest {
    pub name: String,
    pub email: String,
    pub customer: CustomerFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopUpRequest {
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadingRequest {
    pub watts_consumed: f64,
    pub voltage: f64,
    pub current: f64,
}

impl ReadingRequest {
    pub fn watts(watts_consumed: f64) -> Self {
        Self {
            watts_consumed,
            voltage: 230.0,
            current: 5.0,
        }
    }
}

// ============================================================================
// Response fixtures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub customer: Option<CustomerResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub nic_number: String,
    pub watts_consumed: f64,
    pub account_balance_in_rupees: f64,
    pub should_get_service: bool,
    pub previous_voltage_reading: f64,
    pub previous_current_reading: f64,
}

#[derive(Debug, Deserialize)]
pub struct BillResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DeletedResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_nic_number_shape() {
        let a = unique_nic_number();
        let b = unique_nic_number();
        assert_eq!(a.len(), 13);
        assert!(a.bytes().all(|c| c.is_ascii_digit()));
        assert_ne!(a, b);
    }
}
