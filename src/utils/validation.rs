use crate::utils::error::{ResizeError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ResizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Accepts finite values strictly greater than zero.
pub fn validate_positive(field_name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ResizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Bounds use negative numbers as the "unset" sentinel; anything else must be positive.
pub fn validate_optional_bound(field_name: &str, value: f32) -> Result<()> {
    if value < 0.0 {
        return Ok(());
    }
    validate_positive(field_name, value)
}

pub fn validate_ordered_bounds(field_name: &str, min: f32, max: f32) -> Result<()> {
    if min >= 0.0 && max >= 0.0 && min > max {
        return Err(ResizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..{}", min, max),
            reason: "Minimum must not exceed maximum".to_string(),
        });
    }
    Ok(())
}
