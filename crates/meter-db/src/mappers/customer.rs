//! Customer entity <-> model mapper

use chrono::{DateTime, Utc};
use meter_core::entities::Customer;
use meter_core::value_objects::{CustomerId, UserId};

use crate::models::CustomerModel;

/// Convert CustomerModel to Customer entity
impl From<CustomerModel> for Customer {
    fn from(model: CustomerModel) -> Self {
        Customer {
            id: CustomerId::new(model.id),
            user_id: model.user_id.map(UserId::new),
            nic_number: model.nic_number,
            watts_consumed: model.watts_consumed,
            account_balance: model.account_balance,
            should_get_service: model.should_get_service,
            previous_voltage_reading: model.previous_voltage_reading,
            previous_current_reading: model.previous_current_reading,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Metering columns written back after a mutation
pub struct CustomerUpdate {
    pub id: i64,
    pub watts_consumed: f64,
    pub account_balance: f64,
    pub should_get_service: bool,
    pub previous_voltage_reading: f64,
    pub previous_current_reading: f64,
    pub updated_at: DateTime<Utc>,
}

impl CustomerUpdate {
    pub fn new(customer: &Customer) -> Self {
        Self {
            id: customer.id.into_inner(),
            watts_consumed: customer.watts_consumed,
            account_balance: customer.account_balance,
            should_get_service: customer.should_get_service,
            previous_voltage_reading: customer.previous_voltage_reading,
            previous_current_reading: customer.previous_current_reading,
            updated_at: customer.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_from_model() {
        let model = CustomerModel {
            id: 3,
            user_id: Some(9),
            nic_number: "1234567890123".to_string(),
            watts_consumed: 1500.0,
            account_balance: -2.5,
            should_get_service: false,
            previous_voltage_reading: 230.0,
            previous_current_reading: 6.5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let customer = Customer::from(model);
        assert_eq!(customer.id, CustomerId::new(3));
        assert_eq!(customer.user_id, Some(UserId::new(9)));
        assert_eq!(customer.units_consumed(), 1.5);
        assert_eq!(customer.account_balance, -2.5);
    }

    #[test]
    fn test_customer_update_copies_metering_fields() {
        let mut customer =
            Customer::new(CustomerId::new(4), UserId::new(1), "1234567890123".to_string());
        customer.account_balance = 12.0;
        customer.should_get_service = true;

        let update = CustomerUpdate::new(&customer);
        assert_eq!(update.id, 4);
        assert_eq!(update.account_balance, 12.0);
        assert!(update.should_get_service);
    }
}
