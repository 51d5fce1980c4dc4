//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use meter_core::entities::{Customer, Identity, User};

use super::responses::{CustomerResponse, UserResponse};

// ============================================================================
// Customer Mappers
// ============================================================================

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            nic_number: customer.nic_number.clone(),
            watts_consumed: customer.watts_consumed,
            account_balance_in_rupees: customer.account_balance,
            should_get_service: customer.should_get_service,
            previous_voltage_reading: customer.previous_voltage_reading,
            previous_current_reading: customer.previous_current_reading,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self::from(&customer)
    }
}

// ============================================================================
// User Mappers
// ============================================================================

impl UserResponse {
    /// Build a user response with an optional embedded customer
    pub fn with_customer(user: &User, customer: Option<&Customer>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin(),
            customer: customer.map(CustomerResponse::from),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self::with_customer(user, None)
    }
}

impl From<(User, Customer)> for UserResponse {
    fn from((user, customer): (User, Customer)) -> Self {
        Self::with_customer(&user, Some(&customer))
    }
}

impl From<&Identity> for UserResponse {
    fn from(identity: &Identity) -> Self {
        Self::with_customer(identity.user(), identity.customer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meter_core::{CustomerId, Role, UserId};

    fn user(role: Role) -> User {
        User {
            id: UserId::new(3),
            name: "Kamal".to_string(),
            email: "kamal@example.com".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_customer_mapping_renames_balance() {
        let mut customer = Customer::new(CustomerId::new(9), UserId::new(3), "2001123456789".into());
        customer.account_balance = 42.5;

        let response = CustomerResponse::from(&customer);
        assert_eq!(response.account_balance_in_rupees, 42.5);
        assert_eq!(response.nic_number, "2001123456789");
        assert!(!response.should_get_service);
    }

    #[test]
    fn test_identity_mapping() {
        let admin = Identity::Admin(user(Role::Admin));
        let response = UserResponse::from(&admin);
        assert!(response.is_admin);
        assert!(response.customer.is_none());

        let customer = Customer::new(CustomerId::new(9), UserId::new(3), "2001123456789".into());
        let identity = Identity::Customer {
            user: user(Role::Customer),
            customer,
        };
        let response = UserResponse::from(&identity);
        assert!(!response.is_admin);
        assert_eq!(response.customer.map(|c| c.id), Some(CustomerId::new(9)));
    }
}
