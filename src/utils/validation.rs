use crate::utils::error::{RecordsError, Result};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+$").expect("email pattern is a valid regex")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn validate_email(field_name: &str, email: &str) -> Result<()> {
    if !is_valid_email(email) {
        return Err(RecordsError::InvalidFormat {
            field: field_name.to_string(),
            value: email.to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RecordsError::invalid_argument(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| RecordsError::invalid_argument(field_name, "Value is required"))
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(RecordsError::invalid_argument(field_name, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(RecordsError::invalid_argument(
            field_name,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

/// Treats `None` and whitespace-only input the same: "leave unchanged".
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("john.doe@university.edu"));
        assert!(is_valid_email("a+b_c-d@host"));
        assert!(!is_valid_email("john.doe"));
        assert!(!is_valid_email("john@doe@edu"));
        assert!(!is_valid_email("john doe@university.edu"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_validate_email_reports_invalid_format() {
        let err = validate_email("email", "not-an-email").unwrap_err();
        assert!(matches!(err, RecordsError::InvalidFormat { .. }));
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("id", "S001").is_ok());
        assert!(validate_non_empty_string("id", "   ").is_err());
        assert!(validate_non_empty_string("id", "").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let absent: Option<i32> = None;
        assert_eq!(*validate_required_field("credits", &present).unwrap(), 3);
        assert!(validate_required_field("credits", &absent).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("data_directory", "./data").is_ok());
        assert!(validate_path("data_directory", "").is_err());
        assert!(validate_path("data_directory", "da\0ta").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("x")), Some("x"));
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
    }
}
