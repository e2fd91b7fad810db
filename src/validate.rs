//! Field-level validators. Each check is a pure function returning the
//! cleaned value or a [`FieldError`]; request DTOs compose them with
//! [`accumulate`] so a 400 response can list every bad field at once.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::FieldError;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9]{5,15}$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn username(raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if USERNAME_RE.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(FieldError::new(
            "username",
            "must be 5-15 alphanumeric characters",
        ))
    }
}

pub fn email(raw: &str) -> Result<String, FieldError> {
    let cleaned = raw.trim().to_lowercase();
    if EMAIL_RE.is_match(&cleaned) {
        Ok(cleaned)
    } else {
        Err(FieldError::new("email", "not a valid email address"))
    }
}

pub fn password(raw: &str) -> Result<(), FieldError> {
    if raw.len() >= 8 {
        Ok(())
    } else {
        Err(FieldError::new(
            "password",
            "must be at least 8 characters",
        ))
    }
}

/// Quantities must be finite and strictly positive.
pub fn quantity(value: f64) -> Result<f64, FieldError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FieldError::new("quantity", "must be a positive number"))
    }
}

pub fn non_empty(field: &'static str, raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(FieldError::new(field, "must not be empty"))
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn minutes(field: &'static str, value: i32) -> Result<i32, FieldError> {
    if value >= 0 {
        Ok(value)
    } else {
        Err(FieldError::new(field, "must not be negative"))
    }
}

/// Record a failed check and keep going, so callers collect every field
/// error before rejecting the request.
pub fn accumulate<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_accepts_alphanumeric_in_range() {
        assert_eq!(username("cook42").unwrap(), "cook42");
        assert_eq!(username("  cook42  ").unwrap(), "cook42");
        assert_eq!(username("a23456789012345").unwrap().len(), 15);
    }

    #[test]
    fn username_rejects_bad_input() {
        for bad in ["abcd", "toolongusername12345", "with space", "dash-ed", ""] {
            let err = username(bad).unwrap_err();
            assert_eq!(err.field, "username");
        }
    }

    #[test]
    fn email_lowercases_and_trims() {
        assert_eq!(email("  Cook@Example.COM ").unwrap(), "cook@example.com");
        assert_eq!(email("not-an-email").unwrap_err().field, "email");
    }

    #[test]
    fn password_length() {
        assert!(password("12345678").is_ok());
        assert_eq!(password("1234567").unwrap_err().field, "password");
    }

    #[test]
    fn quantity_positive_and_finite() {
        assert_eq!(quantity(1.5).unwrap(), 1.5);
        assert!(quantity(0.0).is_err());
        assert!(quantity(-2.0).is_err());
        assert!(quantity(f64::NAN).is_err());
        assert!(quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn accumulate_collects_errors_in_order() {
        let mut errors = Vec::new();
        let name = accumulate(&mut errors, non_empty("name", "flour"));
        let qty = accumulate(&mut errors, quantity(-1.0));
        accumulate(&mut errors, minutes("prep_time_minutes", -5));
        assert_eq!(name.as_deref(), Some("flour"));
        assert!(qty.is_none());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["quantity", "prep_time_minutes"]);
    }
}
