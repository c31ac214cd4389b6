//! Field validators
//!
//! Pure functions, one per field format. Each returns `Ok` or the first
//! [`FieldError`] that applies. Optional fields accept the empty string; the
//! caller decides when a field is conditionally required.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::FieldError;

/// Minimum length for name-like text (after trimming)
pub const NAME_MIN_LENGTH: usize = 2;

/// Maximum length for name-like text (after trimming)
pub const NAME_MAX_LENGTH: usize = 50;

/// Spanish mobile or landline: 9 digits starting with 6, 7, 8 or 9.
static DOMESTIC_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6789][0-9]{8}$").expect("valid domestic phone regex"));

/// `+` or `00` prefix followed by 10 to 15 digits.
static INTERNATIONAL_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+|00)[0-9]{10,15}$").expect("valid international phone regex")
});

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L} ]+$").expect("valid name regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

/// Validate a phone number.
///
/// Whitespace, dashes and parentheses are ignored. Empty input is valid.
pub fn validate_phone(raw: &str) -> Result<(), FieldError> {
    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    if stripped.is_empty() {
        return Ok(());
    }

    if DOMESTIC_PHONE_RE.is_match(&stripped) || INTERNATIONAL_PHONE_RE.is_match(&stripped) {
        Ok(())
    } else {
        Err(FieldError::InvalidPhoneFormat)
    }
}

/// Validate a URL: empty, or starting with `http://` / `https://` after trimming.
pub fn validate_url(raw: &str) -> Result<(), FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(())
    } else {
        Err(FieldError::MissingScheme)
    }
}

/// Validate an email address. Empty input is valid.
pub fn validate_email(raw: &str) -> Result<(), FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || EMAIL_RE.is_match(trimmed) {
        Ok(())
    } else {
        Err(FieldError::InvalidEmail)
    }
}

/// Validate name-like text (letters and spaces, 2 to 50 characters).
///
/// Checks run in order: required, characters, minimum, maximum.
pub fn validate_name(raw: &str) -> Result<(), FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required);
    }
    if !NAME_RE.is_match(trimmed) {
        return Err(FieldError::InvalidCharacters);
    }
    let length = trimmed.chars().count();
    if length < NAME_MIN_LENGTH {
        return Err(FieldError::TooShort {
            min: NAME_MIN_LENGTH,
        });
    }
    if length > NAME_MAX_LENGTH {
        return Err(FieldError::TooLong {
            max: NAME_MAX_LENGTH,
        });
    }
    Ok(())
}

/// Parse an integer and check it lies in `[min, max]`.
pub fn validate_int_in_range(raw: &str, min: i64, max: i64) -> Result<i64, FieldError> {
    let value: i64 = raw.trim().parse().map_err(|_| FieldError::NotANumber)?;
    if value < min {
        return Err(FieldError::BelowMinimum { min });
    }
    if value > max {
        return Err(FieldError::AboveMaximum { max });
    }
    Ok(value)
}

/// Reject text longer than `max` characters.
pub fn validate_bounded_text(raw: &str, max: usize) -> Result<(), FieldError> {
    if raw.chars().count() > max {
        return Err(FieldError::TooLong { max });
    }
    Ok(())
}
