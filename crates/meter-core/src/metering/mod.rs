//! Metering rules - reading application, balance movements, and bill text
//!
//! Everything here is synchronous and operates on an in-memory `Customer`;
//! persistence and transaction boundaries belong to the callers.

mod balance;
mod ledger;
mod statement;

pub use balance::{apply_debit, apply_top_up, EligibilityChange};
pub use ledger::{apply_reading, ReadingOutcome};
pub use statement::{format_decimal, render_bill};
