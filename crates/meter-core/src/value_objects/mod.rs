//! Value objects - immutable types that represent domain concepts

mod ids;
mod reading;
mod validation;

pub use ids::{CustomerId, IdParseError, UserId};
pub use reading::MeterReading;
pub use validation::{
    email_problem, nic_number_problem, validate_email_address, validate_nic_number,
    NIC_NUMBER_LENGTH,
};
