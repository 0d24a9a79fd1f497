//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Whole soles with zero cents: "350.00"
    pub static ref WHOLE_AMOUNT: Regex = Regex::new(r"(\d{3})\.00").unwrap();

    // Any run of ASCII digits
    pub static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// Keep only the ASCII digits of `text`.
pub fn digits_of(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Non-empty and made only of ASCII digits.
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}
