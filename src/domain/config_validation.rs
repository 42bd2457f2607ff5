//! Configuration validation.
//!
//! Every key is optional. A key that is present must parse and lie in range.

use crate::domain::error::CalcError;
use crate::ports::config_port::ConfigPort;

pub const MAX_PRECISION: i64 = 12;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), CalcError> {
    validate_engine_config(config)?;
    validate_display_config(config)?;
    validate_form_config(config)?;
    Ok(())
}

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), CalcError> {
    if let Some(rounds) = read_int(config, "engine", "max_rounds")? {
        if rounds < 1 {
            return Err(invalid("engine", "max_rounds", "max_rounds must be at least 1"));
        }
    }
    if let Some(tolerance) = read_double(config, "engine", "tolerance")? {
        if tolerance <= 0.0 {
            return Err(invalid("engine", "tolerance", "tolerance must be positive"));
        }
    }
    Ok(())
}

pub fn validate_display_config(config: &dyn ConfigPort) -> Result<(), CalcError> {
    if let Some(precision) = read_int(config, "display", "precision")? {
        if !(0..=MAX_PRECISION).contains(&precision) {
            return Err(invalid(
                "display",
                "precision",
                &format!("precision must be between 0 and {MAX_PRECISION}"),
            ));
        }
    }
    if let Some(tolerance) = read_double(config, "display", "integer_tolerance")? {
        if !(0.0..0.5).contains(&tolerance) {
            return Err(invalid(
                "display",
                "integer_tolerance",
                "integer_tolerance must be at least 0 and below 0.5",
            ));
        }
    }
    Ok(())
}

pub fn validate_form_config(config: &dyn ConfigPort) -> Result<(), CalcError> {
    if let Some(threshold) = read_int(config, "form", "missing_threshold")? {
        if threshold < 0 {
            return Err(invalid(
                "form",
                "missing_threshold",
                "missing_threshold must be non-negative",
            ));
        }
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> CalcError {
    CalcError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn read_int(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<i64>, CalcError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid(section, key, &format!("{key} must be an integer"))),
    }
}

fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, CalcError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| invalid(section, key, &format!("{key} must be a finite number"))),
    }
}
