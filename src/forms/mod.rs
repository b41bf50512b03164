//! Form definitions backing the grounds routes.
//!
//! Forms deserialize raw HTML input; their `TryFrom` impls validate it into
//! payloads that only carry domain value objects.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use validator::ValidationErrors;

pub mod events;
pub mod owners;
pub mod personnel;
pub mod price_master;
pub mod properties;
pub mod quotes;
pub mod regions;
pub mod tickets;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("amounts must be non-negative numbers")]
    InvalidAmount,

    #[error("visit counts must be non-negative whole numbers")]
    InvalidCount,

    #[error("invalid date, expected YYYY-MM-DD")]
    InvalidDate,

    #[error("invalid time, expected HH:MM")]
    InvalidTime,

    #[error("invalid identifier")]
    InvalidId,

    #[error("category is required")]
    MissingCategory,

    #[error("invalid status")]
    InvalidStatus,

    #[error("invalid priority")]
    InvalidPriority,

    #[error("invalid service code")]
    InvalidServiceCode,

    #[error("only png, jpg, jpeg and pdf files can be attached")]
    UnsupportedAttachment,

    #[error("malformed form: {0}")]
    Malformed(String),
}

/// Trims the value, mapping blank input to `None`.
pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Parses an optional money input; blank means `None`.
pub(crate) fn parse_optional_amount(value: &str) -> Result<Option<f64>, FormError> {
    non_blank(value)
        .map(|v| {
            v.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .ok_or(FormError::InvalidAmount)
        })
        .transpose()
}

/// Parses a money input where blank means zero.
pub(crate) fn parse_amount_or_zero(value: &str) -> Result<f64, FormError> {
    Ok(parse_optional_amount(value)?.unwrap_or(0.0))
}

pub(crate) fn parse_optional_i32(value: &str) -> Result<Option<i32>, FormError> {
    non_blank(value)
        .map(|v| v.parse::<i32>().map_err(|_| FormError::InvalidCount))
        .transpose()
}

pub(crate) fn parse_optional_id(value: &str) -> Result<Option<i32>, FormError> {
    non_blank(value)
        .map(|v| {
            v.parse::<i32>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or(FormError::InvalidId)
        })
        .transpose()
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate)
}

/// Accepts `HH:MM` and `HH:MM:SS`; blank means no time.
pub(crate) fn parse_optional_time(value: &str) -> Result<Option<NaiveTime>, FormError> {
    non_blank(value)
        .map(|v| {
            NaiveTime::parse_from_str(v, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(v, "%H:%M:%S"))
                .map_err(|_| FormError::InvalidTime)
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_numbers_are_absent() {
        assert_eq!(parse_optional_amount("  ").unwrap(), None);
        assert_eq!(parse_optional_amount("12.5").unwrap(), Some(12.5));
        assert!(matches!(
            parse_optional_amount("-1"),
            Err(FormError::InvalidAmount)
        ));
        assert!(matches!(
            parse_optional_amount("NaN"),
            Err(FormError::InvalidAmount)
        ));
        assert_eq!(parse_amount_or_zero("").unwrap(), 0.0);
    }

    #[test]
    fn ids_must_be_positive() {
        assert_eq!(parse_optional_id("").unwrap(), None);
        assert_eq!(parse_optional_id("4").unwrap(), Some(4));
        assert!(matches!(parse_optional_id("0"), Err(FormError::InvalidId)));
    }

    #[test]
    fn times_accept_minutes_and_seconds() {
        let expected = NaiveTime::from_hms_opt(9, 30, 0);
        assert_eq!(parse_optional_time("09:30").unwrap(), expected);
        assert_eq!(parse_optional_time("09:30:00").unwrap(), expected);
        assert_eq!(parse_optional_time("").unwrap(), None);
        assert!(matches!(
            parse_optional_time("9.30am"),
            Err(FormError::InvalidTime)
        ));
    }
}
