//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use meter_core::{CustomerId, UserId};
use serde::Serialize;

// ============================================================================
// User Responses
// ============================================================================

/// User record, with the metering record embedded for customers
///
/// `customer` is `null` for administrators.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub customer: Option<CustomerResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer metering record
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub nic_number: String,
    pub watts_consumed: f64,
    pub account_balance_in_rupees: f64,
    pub should_get_service: bool,
    pub previous_voltage_reading: f64,
    pub previous_current_reading: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rendered bill
#[derive(Debug, Clone, Serialize)]
pub struct BillResponse {
    pub message: String,
}

/// Acknowledgement for deletions
#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub detail: String,
}

impl DeletedResponse {
    pub fn deleted() -> Self {
        Self {
            detail: "Deleted successfully".to_string(),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: String,
}

impl ReadinessResponse {
    pub fn ready(storage_healthy: bool) -> Self {
        Self {
            status: if storage_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                storage: if storage_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
