//! Field rules shared by request validation and the domain

use std::borrow::Cow;

use validator::ValidationError;

/// Required length of a NIC number, in characters
pub const NIC_NUMBER_LENGTH: usize = 13;

/// Describe what is wrong with a NIC number, if anything
pub fn nic_number_problem(nic_number: &str) -> Option<&'static str> {
    if nic_number.chars().count() != NIC_NUMBER_LENGTH {
        Some("must be 13 digits long")
    } else if nic_number.contains(' ') {
        Some("must not contain a space")
    } else if nic_number.contains('-') {
        Some("must not contain any dashes")
    } else {
        None
    }
}

/// Describe what is wrong with an email address, if anything
///
/// Deliberately loose: only spaces and a missing `@` are rejected.
pub fn email_problem(email: &str) -> Option<&'static str> {
    if email.contains(' ') {
        Some("must not contain a space")
    } else if !email.contains('@') {
        Some("must be a valid email address")
    } else {
        None
    }
}

/// `validator` custom rule for NIC numbers
pub fn validate_nic_number(nic_number: &str) -> Result<(), ValidationError> {
    match nic_number_problem(nic_number) {
        Some(message) => Err(ValidationError::new("nic_number").with_message(Cow::Borrowed(message))),
        None => Ok(()),
    }
}

/// `validator` custom rule for email addresses
pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    match email_problem(email) {
        Some(message) => Err(ValidationError::new("email").with_message(Cow::Borrowed(message))),
        None => Ok(()),
    }
}
