//! Shared field validation helpers.
//!
//! Every helper returns [`CoreError::Validation`] naming the offending field
//! so handlers can surface the message verbatim.

use std::sync::OnceLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;

/// Reject empty or whitespace-only strings.
pub fn require_non_empty(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Like [`require_non_empty`] but only when a value is supplied.
pub fn optional_non_empty(value: Option<&str>, field: &str) -> Result<(), CoreError> {
    match value {
        Some(v) => require_non_empty(v, field),
        None => Ok(()),
    }
}

/// Validate an email address.
pub fn validate_email(value: &str, field: &str) -> Result<(), CoreError> {
    if !value.trim().validate_email() {
        return Err(CoreError::Validation(format!(
            "{field} is not a valid email address: '{value}'"
        )));
    }
    Ok(())
}

/// Normalize an email for storage and comparison.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

fn slug_regex() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"))
}

/// Validate a URL slug: lowercase alphanumerics separated by single hyphens.
pub fn validate_slug(value: &str, field: &str) -> Result<(), CoreError> {
    if !slug_regex().is_match(value) {
        return Err(CoreError::Validation(format!(
            "{field} must be lowercase letters, digits and single hyphens, got '{value}'"
        )));
    }
    Ok(())
}

/// Validate that a price in minor units is non-negative.
pub fn validate_price_cents(value: i64, field: &str) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Validate a billing interval name.
pub fn validate_billing_interval(value: &str) -> Result<(), CoreError> {
    match value {
        "month" | "year" => Ok(()),
        other => Err(CoreError::Validation(format!(
            "billing_interval must be 'month' or 'year', got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn non_empty_rejects_whitespace() {
        assert_matches!(require_non_empty("  ", "name"), Err(CoreError::Validation(_)));
        assert!(require_non_empty("Studio", "name").is_ok());
        assert!(optional_non_empty(None, "name").is_ok());
        assert!(optional_non_empty(Some(""), "name").is_err());
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("casting@studio.example", "email").is_ok());
        assert!(validate_email(" casting@studio.example ", "email").is_ok());
        assert!(validate_email("not-an-email", "email").is_err());
        assert!(validate_email("", "email").is_err());
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn slug_validation() {
        assert!(validate_slug("north-studio", "slug").is_ok());
        assert!(validate_slug("studio42", "slug").is_ok());
        assert!(validate_slug("North", "slug").is_err());
        assert!(validate_slug("a--b", "slug").is_err());
        assert!(validate_slug("-a", "slug").is_err());
    }

    #[test]
    fn price_and_interval() {
        assert!(validate_price_cents(0, "price_cents").is_ok());
        assert!(validate_price_cents(-1, "price_cents").is_err());
        assert!(validate_billing_interval("month").is_ok());
        assert!(validate_billing_interval("week").is_err());
    }
}
