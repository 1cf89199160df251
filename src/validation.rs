use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::ApiError;

pub const PASSWORD_POLICY: &str =
    "Password must be at least 6 characters long, contain an uppercase letter and a number";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$")
        .expect("email pattern is a valid regex")
});

/// require_fields
///
/// Fails with "Missing fields: a, b" listing every absent field in the order given.
pub fn require_fields(fields: &[(&str, bool)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        )))
    }
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(ApiError::validation("Invalid email format"))
    }
}

/// At least 6 characters, one digit and one uppercase letter.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    let long_enough = password.chars().count() >= 6;
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_upper = password.chars().any(char::is_uppercase);

    if long_enough && has_digit && has_upper {
        Ok(())
    } else {
        Err(ApiError::validation(PASSWORD_POLICY))
    }
}

/// Parses a date-only `YYYY-MM-DD` deadline.
pub fn parse_deadline(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("Invalid deadline_date, expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        for email in ["a@b.com", "first.last+tag@mail-host.co.uk", "x_y@d.io"] {
            assert!(validate_email(email).is_ok(), "{email} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "plain", "a@b", "@b.com", "a b@c.com", "a@b_c.com"] {
            assert!(validate_email(email).is_err(), "{email} should be invalid");
        }
    }

    #[test]
    fn password_boundary_is_six_characters() {
        assert!(validate_password("Abcde1").is_ok());
        assert!(validate_password("Abcd1").is_err());
    }

    #[test]
    fn password_needs_digit_and_uppercase() {
        let err = validate_password("abcdef1").unwrap_err();
        assert_eq!(err.to_string(), PASSWORD_POLICY);
        assert!(validate_password("Abcdefg").is_err());
    }

    #[test]
    fn missing_fields_are_listed_in_order() {
        let err = require_fields(&[("name", false), ("email", true), ("password", false)])
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing fields: name, password");
    }

    #[test]
    fn deadline_must_be_a_real_date() {
        assert!(parse_deadline("2024-02-29").is_ok());
        assert!(parse_deadline("2024-13-40").is_err());
        assert!(parse_deadline("30/06/2024").is_err());
    }
}
