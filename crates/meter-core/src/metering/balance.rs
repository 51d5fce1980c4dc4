use serde::Serialize;

use crate::entities::Customer;
use crate::error::DomainError;

/// How a balance movement affected the eligibility flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityChange {
    Enabled,
    Disabled,
    Unchanged,
}

impl EligibilityChange {
    fn between(before: bool, after: bool) -> Self {
        match (before, after) {
            (false, true) => Self::Enabled,
            (true, false) => Self::Disabled,
            _ => Self::Unchanged,
        }
    }
}

/// Debit the balance; service is cut once it reaches zero or below
///
/// A debit never fails, the balance may go arbitrarily negative.
pub fn apply_debit(customer: &mut Customer, amount: f64) -> EligibilityChange {
    let before = customer.should_get_service;

    customer.account_balance -= amount;
    if customer.account_balance <= 0.0 {
        customer.should_get_service = false;
    }
    customer.touch();

    EligibilityChange::between(before, customer.should_get_service)
}

/// Credit the balance; service resumes only once it is strictly positive
///
/// A credit that leaves the balance at or below zero does not touch the flag.
pub fn apply_top_up(customer: &mut Customer, amount: f64) -> Result<EligibilityChange, DomainError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(DomainError::invalid_field(
            "amount",
            "top-up amount must be a non-negative number",
        ));
    }

    let before = customer.should_get_service;

    customer.account_balance += amount;
    if customer.account_balance > 0.0 {
        customer.should_get_service = true;
    }
    customer.touch();

    Ok(EligibilityChange::between(before, customer.should_get_service))
}
