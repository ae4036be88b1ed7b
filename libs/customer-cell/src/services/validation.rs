use std::sync::OnceLock;

use regex::Regex;

use crate::models::CustomerError;

pub const MIN_NAME_LEN: usize = 3;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// Keeps only the digits; a valid number has area code plus 8 or 9 digits.
pub fn normalize_phone(raw: &str) -> Result<String, CustomerError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        10 | 11 => Ok(digits),
        _ => Err(CustomerError::InvalidPhone),
    }
}

pub fn validate_name(raw: &str) -> Result<String, CustomerError> {
    let name = raw.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(CustomerError::NameTooShort { min: MIN_NAME_LEN });
    }
    Ok(name.to_string())
}

/// Empty means "no email", which is allowed.
pub fn validate_email(raw: Option<&str>) -> Result<Option<String>, CustomerError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(email) if email_pattern().is_match(email) => Ok(Some(email.to_string())),
        Some(_) => Err(CustomerError::InvalidEmail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_phone_normalization() {
        assert_eq!(normalize_phone("(11) 99999-9999").unwrap(), "11999999999");
        assert_eq!(normalize_phone("11 3333-4444").unwrap(), "1133334444");
        assert_matches!(normalize_phone("99999-999"), Err(CustomerError::InvalidPhone));
        assert_matches!(normalize_phone("+55 11 99999-9999"), Err(CustomerError::InvalidPhone));
        assert_matches!(normalize_phone(""), Err(CustomerError::InvalidPhone));
    }

    #[test]
    fn test_name_length_counts_characters() {
        assert_matches!(validate_name("Jo"), Err(CustomerError::NameTooShort { min: 3 }));
        assert_matches!(validate_name("  Jo  "), Err(CustomerError::NameTooShort { .. }));
        assert_eq!(validate_name("Ana").unwrap(), "Ana");
        assert!(validate_name(" Zé ").is_err());
        assert_eq!(validate_name("Zéa").unwrap(), "Zéa");
    }

    #[test]
    fn test_email_is_optional_but_checked() {
        assert_eq!(validate_email(None).unwrap(), None);
        assert_eq!(validate_email(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_email(Some("joao@example.com")).unwrap(),
            Some("joao@example.com".to_string())
        );
        assert_matches!(validate_email(Some("joao@")), Err(CustomerError::InvalidEmail));
    }
}
