//! Currency formatting and phone normalization

use sushi_types::{Clp, ValidationError};

/// Format pesos as "$12.990"
pub fn format_clp(amount: Clp) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Normalize a Chilean mobile number to +569XXXXXXXX
pub fn normalize_phone(input: &str) -> Result<String, ValidationError> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    let local = match digits.len() {
        11 if digits.starts_with("569") => &digits[2..],
        9 if digits.starts_with('9') => &digits[..],
        8 => return Ok(format!("+569{}", digits)),
        _ => return Err(ValidationError::InvalidPhone(input.to_string())),
    };

    Ok(format!("+56{}", local))
}
