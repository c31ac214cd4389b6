//! Validation modules

pub mod fields;

pub use fields::{
    validate_bounded_text, validate_email, validate_int_in_range, validate_name, validate_phone,
    validate_url, NAME_MAX_LENGTH, NAME_MIN_LENGTH,
};
