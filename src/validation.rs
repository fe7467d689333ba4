// SPDX-License-Identifier: MIT

//! Field-level checks applied before caller-supplied data reaches storage.

use chrono::NaiveDate;
use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("A valid email address is required")]
    Email,

    #[error("Name is required")]
    NameRequired,

    #[error("Name must be less than 100 characters")]
    NameTooLong,

    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("Date must be a valid YYYY-MM-DD date")]
    Date,

    #[error("Hours cannot be negative")]
    NegativeHours,

    #[error("Hours cannot exceed 24")]
    TooManyHours,
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() || !email.validate_email() {
        return Err(ValidationError::Email);
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if name.len() > 100 {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Log entries are keyed by ISO `YYYY-MM-DD`; anything else is rejected.
pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    if date.len() != 10 || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(ValidationError::Date);
    }
    Ok(())
}

pub fn validate_hours(hours: f64) -> Result<(), ValidationError> {
    if hours < 0.0 {
        return Err(ValidationError::NegativeHours);
    }
    if hours > 24.0 {
        return Err(ValidationError::TooManyHours);
    }
    Ok(())
}
