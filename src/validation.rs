// Validation utilities module
// Custom validation functions used by the request DTOs' validator derives

use crate::engine::hours::{TimeOfDay, WeeklySchedule};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;
use validator::ValidationError;

fn hex_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"))
}

/// Validates that a price is zero or positive
pub fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        Err(ValidationError::new("price_must_be_non_negative"))
    } else {
        Ok(())
    }
}

/// Validates a `#rrggbb` colour
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if hex_color_pattern().is_match(color) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_hex_color"))
    }
}

/// Validates a strict `HH:MM` time of day
pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    TimeOfDay::parse(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_time_format"))
}

/// Validates every open/close time of a weekly schedule
pub fn validate_schedule(schedule: &WeeklySchedule) -> Result<(), ValidationError> {
    schedule
        .validate()
        .map_err(|_| ValidationError::new("invalid_opening_hours"))
}

/// Validates that a string is not blank after trimming
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}
