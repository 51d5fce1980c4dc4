use serde::Serialize;

use super::balance::{apply_debit, EligibilityChange};
use crate::entities::Customer;
use crate::value_objects::MeterReading;

/// What a single reading did to a customer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadingOutcome {
    pub units: f64,
    pub cost: f64,
    pub eligibility: EligibilityChange,
}

/// Record a reading and debit its cost at `price` per unit
///
/// The telemetry snapshot is overwritten before consumption and balance move.
pub fn apply_reading(customer: &mut Customer, reading: &MeterReading, price: f64) -> ReadingOutcome {
    customer.previous_voltage_reading = reading.voltage();
    customer.previous_current_reading = reading.current();

    customer.watts_consumed += reading.watts_consumed();

    let units = reading.units();
    let cost = units * price;
    let eligibility = apply_debit(customer, cost);

    ReadingOutcome {
        units,
        cost,
        eligibility,
    }
}
