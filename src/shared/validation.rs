use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for URL-safe slugs
    /// Must be lowercase alphanumeric segments joined by single hyphens
    /// - Valid: "office-chairs", "tv2", "home-and-garden"
    /// - Invalid: "-chairs", "chairs-", "office--chairs", "Chairs", "office_chairs"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Rejects strings made only of whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("furniture"));
        assert!(SLUG_REGEX.is_match("office-chairs"));
        assert!(SLUG_REGEX.is_match("tv2"));
        assert!(SLUG_REGEX.is_match("a-b-c"));
        assert!(SLUG_REGEX.is_match("4k-monitors"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-chairs")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("chairs-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("office--chairs")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Chairs")); // uppercase
        assert!(!SLUG_REGEX.is_match("office_chairs")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
        assert!(!SLUG_REGEX.is_match("office chairs")); // space
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Chairs").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }
}
