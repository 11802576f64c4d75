//! Chilean RUT (Rol Único Tributario) parsing and checksum

use serde::{Deserialize, Serialize};
use sushi_types::ValidationError;

/// Parsed and checksum-verified RUT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rut {
    pub body: u32,
    pub check_digit: char,
}

impl Rut {
    /// Parse "12.345.678-5", "12345678-5" or "123456785"
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned: String = input
            .chars()
            .filter(|c| !matches!(c, '.' | '-' | ' '))
            .collect::<String>()
            .to_uppercase();

        let invalid = || ValidationError::InvalidRut(input.to_string());

        if cleaned.len() < 2 || cleaned.len() > 10 {
            return Err(invalid());
        }

        let (body_str, dv_str) = cleaned.split_at(cleaned.len() - 1);
        if !body_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let body: u32 = body_str.parse().map_err(|_| invalid())?;
        if body == 0 {
            return Err(invalid());
        }

        let check_digit = dv_str.chars().next().ok_or_else(invalid)?;
        if check_digit != compute_check_digit(body) {
            return Err(invalid());
        }

        Ok(Self { body, check_digit })
    }
}

impl std::fmt::Display for Rut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.body.to_string();
        let mut grouped = String::new();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "{}-{}", grouped, self.check_digit)
    }
}

/// Modulo-11 check digit with weights 2..=7 from the rightmost digit
pub fn compute_check_digit(body: u32) -> char {
    let mut sum = 0u32;
    let mut weight = 2u32;
    let mut rest = body;
    while rest > 0 {
        sum += (rest % 10) * weight;
        rest /= 10;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }
    match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

/// Whether `input` parses as a RUT with a correct check digit
pub fn validate_rut(input: &str) -> bool {
    Rut::parse(input).is_ok()
}

/// Canonical "12.345.678-5" form
pub fn format_rut(input: &str) -> Result<String, ValidationError> {
    Rut::parse(input).map(|rut| rut.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_digit() {
        assert_eq!(compute_check_digit(12_345_678), '5');
        assert_eq!(compute_check_digit(11_111_111), '1');
        assert_eq!(compute_check_digit(10_000_013), 'K');
        assert_eq!(compute_check_digit(14), '0');
    }

    #[test]
    fn test_valid_formats() {
        assert!(validate_rut("12.345.678-5"));
        assert!(validate_rut("12345678-5"));
        assert!(validate_rut("123456785"));
        assert!(validate_rut("10.000.013-k"));
        assert!(validate_rut(" 14-0 "));
    }

    #[test]
    fn test_invalid() {
        assert!(!validate_rut("12.345.678-4"));
        assert!(!validate_rut(""));
        assert!(!validate_rut("5"));
        assert!(!validate_rut("12a45678-5"));
        assert!(!validate_rut("0-0"));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_rut("123456785").unwrap(), "12.345.678-5");
        assert_eq!(format_rut("10000013k").unwrap(), "10.000.013-K");
        assert_eq!(format_rut("14-0").unwrap(), "14-0");
        assert_eq!(format_rut("1.234.567-4").unwrap(), "1.234.567-4");
    }
}
