//! # meter-core
//!
//! Domain layer for the prepaid metering service: users and customers, the
//! time-of-day tariff, the consumption ledger, balance and eligibility rules,
//! bill rendering, and the repository traits the storage layer implements.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod metering;
pub mod tariff;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Customer, Identity, NewUser, RequiredRole, Role, User, WATTS_PER_UNIT};
pub use error::DomainError;
pub use metering::{
    apply_debit, apply_reading, apply_top_up, format_decimal, render_bill, EligibilityChange,
    ReadingOutcome,
};
pub use tariff::{Clock, FixedClock, SystemClock, TariffPeriod, TariffSchedule};
pub use traits::{CustomerMutation, CustomerRepository, RepoResult, UserFilter, UserRepository};
pub use value_objects::{
    email_problem, nic_number_problem, validate_email_address, validate_nic_number, CustomerId,
    IdParseError, MeterReading, UserId, NIC_NUMBER_LENGTH,
};
