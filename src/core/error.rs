//! Validation errors shared by the pricing models

use miette::Diagnostic;
use thiserror::Error;

/// Rejected input to a mutating model operation
///
/// Any operation returning this error leaves the model untouched.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ValidationError {
    #[error("{field} must be a finite number (got {value})")]
    #[diagnostic(code(priceplan::validation::non_finite))]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    #[diagnostic(code(priceplan::validation::negative))]
    Negative { field: &'static str, value: f64 },

    #[error("{field} is out of range: {value} (expected {expected})")]
    #[diagnostic(code(priceplan::validation::out_of_range))]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("unknown market position '{0}'")]
    #[diagnostic(
        code(priceplan::validation::market_position),
        help("use one of: budget, mid-market, premium")
    )]
    UnknownMarketPosition(String),

    #[error("unknown pricing strategy '{0}'")]
    #[diagnostic(
        code(priceplan::validation::strategy),
        help("use one of: cost-plus, competitor, value, optimal")
    )]
    UnknownStrategy(String),

    #[error("{0} must not be empty")]
    #[diagnostic(code(priceplan::validation::empty))]
    Empty(&'static str),

    #[error("segment id {0} appears more than once")]
    #[diagnostic(code(priceplan::validation::duplicate_id))]
    DuplicateSegment(String),

    #[error("could not generate identifier: {0}")]
    #[diagnostic(code(priceplan::validation::identity))]
    Identity(String),
}

/// Require a finite, non-negative number
pub fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

/// Require a finite number
pub fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_accepts_zero() {
        assert_eq!(non_negative("amount", 0.0), Ok(0.0));
    }

    #[test]
    fn test_non_negative_rejects_nan_and_negative() {
        assert!(matches!(
            non_negative("amount", f64::NAN),
            Err(ValidationError::NonFinite { field: "amount", .. })
        ));
        assert!(matches!(
            non_negative("amount", -1.0),
            Err(ValidationError::Negative { field: "amount", .. })
        ));
    }

    #[test]
    fn test_finite_allows_negative() {
        assert_eq!(finite("elasticity", -2.5), Ok(-2.5));
        assert!(finite("elasticity", f64::INFINITY).is_err());
    }
}
