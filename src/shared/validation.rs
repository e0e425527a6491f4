use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating reporter phone numbers
    /// Optional leading "+", then digits separated by spaces or hyphens
    /// - Valid: "0812-3456-7890", "+62 812 3456 7890", "081234567890"
    /// - Invalid: "phone", "12-34", "0812--3456", "0812 3456 7890 ext 5"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]+(?:[ -][0-9]+)*$").unwrap();
}

/// Minimum and maximum number of digits in a phone number
const PHONE_MIN_DIGITS: usize = 8;
const PHONE_MAX_DIGITS: usize = 15;

/// Check that a contact string looks like a phone number
pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    if !PHONE_REGEX.is_match(value) {
        return false;
    }
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_valid() {
        assert!(is_valid_phone("0812-3456-7890"));
        assert!(is_valid_phone("+62 812 3456 7890"));
        assert!(is_valid_phone("081234567890"));
        assert!(is_valid_phone(" 021 555 1234 "));
    }

    #[test]
    fn test_phone_invalid() {
        assert!(!is_valid_phone("phone")); // letters
        assert!(!is_valid_phone("12-34")); // too short
        assert!(!is_valid_phone("0812--3456-7890")); // double separator
        assert!(!is_valid_phone("-0812345678")); // leading separator
        assert!(!is_valid_phone("")); // empty
        assert!(!is_valid_phone("0812345678901234567")); // too long
    }
}
