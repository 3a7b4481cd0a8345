//! Input sanitization and validation helpers shared by the route handlers.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum length for short titles (tasks, goals, habits, note titles).
pub const MAX_TITLE_LENGTH: usize = 500;

/// Maximum length for long content (note bodies).
pub const MAX_CONTENT_LENGTH: usize = 50_000;

/// Maximum length for a user display name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Upper bound for finance amounts.
pub const MAX_AMOUNT: f64 = 1e12;

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Strip leading/trailing whitespace and limit length (by characters, not bytes).
pub fn sanitize_string(value: &str, max_length: usize) -> String {
    value.trim().chars().take(max_length).collect()
}

/// Sanitize a short title (tasks, goals, habits, note title).
pub fn sanitize_title(value: &str) -> String {
    sanitize_string(value, MAX_TITLE_LENGTH)
}

/// Sanitize long content (notes).
pub fn sanitize_content(value: &str) -> String {
    sanitize_string(value, MAX_CONTENT_LENGTH)
}

/// Sanitize a user display name.
pub fn sanitize_name(value: &str) -> String {
    sanitize_string(value, MAX_NAME_LENGTH)
}

/// Validate email format.
pub fn is_valid_email(value: &str) -> bool {
    let email = value.trim().to_lowercase();
    email.len() <= 255 && email_regex().is_match(&email)
}

/// Validate password length.
pub fn is_valid_password(value: &str) -> bool {
    value.len() >= MIN_PASSWORD_LENGTH
}

/// Validate a `YYYY-MM-DD` date string, rejecting impossible calendar dates.
pub fn is_valid_date_string(value: &str) -> bool {
    date_regex().is_match(value) && chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Parse a valid `YYYY-MM-DD` string into a calendar date.
pub fn parse_day(value: &str) -> Option<chrono::NaiveDate> {
    if is_valid_date_string(value) {
        chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    } else {
        None
    }
}

/// Validate and normalize an amount: non-negative, capped, rounded to cents.
pub fn parse_amount(value: f64) -> Option<f64> {
    if value.is_nan() || !(0.0..=MAX_AMOUNT).contains(&value) {
        return None;
    }
    Some(round_cents(value))
}

/// Round a monetary value to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
