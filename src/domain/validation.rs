//! Raw input normalization and domain checks.
//!
//! Turns keystrokes into nullable numbers and rejects values outside a
//! field's [`InputDomain`] before they reach the engine.

use crate::domain::error::CalcError;
use crate::domain::field::{FieldId, InputDomain};

/// Strip every minus sign; the form does not accept negative entry.
pub fn sanitize(raw: &str) -> String {
    raw.replace('-', "")
}

/// Parse raw text into a number. Empty, unparsable and non-finite text is
/// unknown. Comma thousands separators are ignored.
pub fn parse_input(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check `value` against the input domain of `field`. Unknown always passes.
pub fn validate(field: FieldId, value: Option<f64>) -> Result<Option<f64>, CalcError> {
    let Some(v) = value else {
        return Ok(None);
    };
    match field.input_domain() {
        InputDomain::Percent if !(0.0..=100.0).contains(&v) => Err(CalcError::InvalidInput {
            field,
            reason: "percentage must be between 0 and 100".to_string(),
        }),
        InputDomain::NonNegative if v < 0.0 => Err(CalcError::InvalidInput {
            field,
            reason: "value cannot be negative".to_string(),
        }),
        _ => Ok(Some(v)),
    }
}

/// Parse and validate in one step, without sanitizing.
pub fn parse_field(field: FieldId, raw: &str) -> Result<Option<f64>, CalcError> {
    validate(field, parse_input(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_numbers() {
        assert_eq!(parse_input("100"), Some(100.0));
        assert_eq!(parse_input(" 12.5 "), Some(12.5));
        assert_eq!(parse_input("1e3"), Some(1000.0));
        assert_eq!(parse_input("0"), Some(0.0));
    }

    #[test]
    fn parse_strips_thousands_separators() {
        assert_eq!(parse_input("1,234,567.5"), Some(1_234_567.5));
    }

    #[test]
    fn parse_unknown_inputs() {
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("   "), None);
        assert_eq!(parse_input("abc"), None);
        assert_eq!(parse_input("1.2.3"), None);
        assert_eq!(parse_input("inf"), None);
        assert_eq!(parse_input("NaN"), None);
    }

    #[test]
    fn sanitize_removes_minus_signs() {
        assert_eq!(sanitize("-12"), "12");
        assert_eq!(sanitize("1-2-"), "12");
        assert_eq!(sanitize("-"), "");
    }

    #[test]
    fn negative_rejected_on_amount_fields() {
        for field in [FieldId::EntryPrice, FieldId::Quantity, FieldId::TargetPercent] {
            let err = validate(field, Some(-1.0)).unwrap_err();
            assert!(matches!(err, CalcError::InvalidInput { field: f, .. } if f == field));
        }
    }

    #[test]
    fn sl_percent_range() {
        assert_eq!(validate(FieldId::SlPercent, Some(0.0)).unwrap(), Some(0.0));
        assert_eq!(validate(FieldId::SlPercent, Some(100.0)).unwrap(), Some(100.0));
        assert!(validate(FieldId::SlPercent, Some(100.5)).is_err());
        assert!(validate(FieldId::SlPercent, Some(-0.5)).is_err());
    }

    #[test]
    fn risk_reward_unrestricted() {
        assert_eq!(validate(FieldId::RiskReward, Some(-2.0)).unwrap(), Some(-2.0));
    }

    #[test]
    fn unknown_always_valid() {
        for field in FieldId::ALL {
            assert_eq!(validate(field, None).unwrap(), None);
        }
    }

    #[test]
    fn parse_field_combines_both_steps() {
        assert_eq!(parse_field(FieldId::EntryPrice, "1,000").unwrap(), Some(1000.0));
        assert!(parse_field(FieldId::SlPercent, "150").is_err());
        assert_eq!(parse_field(FieldId::Quantity, "x").unwrap(), None);
    }
}
