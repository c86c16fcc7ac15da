//! Input validation helpers shared across API handlers

use super::{AppError, AppResult};

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_NOTE_LEN: usize = 500;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Require a non-empty trimmed string within the length limit
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} exceeds {max_len} characters"
        )));
    }
    Ok(())
}

/// Length-check an optional string (None and empty are fine)
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value {
        if v.chars().count() > max_len {
            return Err(AppError::validation(format!(
                "{field} exceeds {max_len} characters"
            )));
        }
    }
    Ok(())
}

/// Validate a monetary amount is finite and non-negative
pub fn validate_cash(value: f64, field: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_required_text() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Mesa 4", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn rejects_negative_and_non_finite_cash() {
        assert!(validate_cash(-0.01, "initial_amount").is_err());
        assert!(validate_cash(f64::NAN, "initial_amount").is_err());
        assert!(validate_cash(f64::INFINITY, "initial_amount").is_err());
        assert!(validate_cash(0.0, "initial_amount").is_ok());
        assert!(validate_cash(100.0, "initial_amount").is_ok());
    }
}
