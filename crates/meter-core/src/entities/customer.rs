//! Customer entity - the metering account owned by a customer user

use chrono::{DateTime, Utc};

use crate::value_objects::{CustomerId, UserId};

/// Watts per billable unit
pub const WATTS_PER_UNIT: f64 = 1000.0;

/// Customer entity
///
/// Cumulative consumption is kept in watts. The balance is signed and may go
/// negative; `should_get_service` is only ever written together with the
/// balance change that flipped it.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: Option<UserId>,
    pub nic_number: String,
    pub watts_consumed: f64,
    pub account_balance: f64,
    pub should_get_service: bool,
    pub previous_voltage_reading: f64,
    pub previous_current_reading: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// A freshly registered customer: no balance, no consumption, no service
    pub fn new(id: CustomerId, user_id: UserId, nic_number: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: Some(user_id),
            nic_number,
            watts_consumed: 0.0,
            account_balance: 0.0,
            should_get_service: false,
            previous_voltage_reading: 0.0,
            previous_current_reading: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Cumulative consumption in billable units
    #[inline]
    pub fn units_consumed(&self) -> f64 {
        self.watts_consumed / WATTS_PER_UNIT
    }

    /// Mark the record as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_defaults() {
        let customer = Customer::new(CustomerId::new(1), UserId::new(2), "1234567890123".into());
        assert_eq!(customer.user_id, Some(UserId::new(2)));
        assert_eq!(customer.account_balance, 0.0);
        assert_eq!(customer.watts_consumed, 0.0);
        assert!(!customer.should_get_service);
        assert_eq!(customer.previous_voltage_reading, 0.0);
        assert_eq!(customer.previous_current_reading, 0.0);
    }

    #[test]
    fn test_units_consumed() {
        let mut customer =
            Customer::new(CustomerId::new(1), UserId::new(2), "1234567890123".into());
        customer.watts_consumed = 5000.0;
        assert_eq!(customer.units_consumed(), 5.0);
    }
}
