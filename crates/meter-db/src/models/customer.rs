//! Customer database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for customers table
#[derive(Debug, Clone, FromRow)]
pub struct CustomerModel {
    pub id: i64,
    pub user_id: Option<i64>,
    pub nic_number: String,
    pub watts_consumed: f64,
    pub account_balance: f64,
    pub should_get_service: bool,
    pub previous_voltage_reading: f64,
    pub previous_current_reading: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
