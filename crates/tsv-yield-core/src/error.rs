use std::fmt;

use thiserror::Error;

/// Which amount rule rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountIssue {
    /// Sell amount is below the buy amount.
    SellBelowBuy,
    /// Buy amount is zero or negative, so yields have no denominator.
    NonPositiveBuy,
}

impl fmt::Display for AmountIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountIssue::SellBelowBuy => f.write_str("Sell amount should be greater than Buy amount"),
            AmountIssue::NonPositiveBuy => f.write_str("Buy amount must be greater than zero"),
        }
    }
}

/// Input rejected by the yield calculator before any arithmetic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}")]
    InvalidAmounts(AmountIssue),

    #[error("Credit days cannot exceed 365")]
    InvalidCreditDays,

    #[error("Desired profit margin must be greater than 0% and less than 100%")]
    InvalidMargin,

    /// A result left the Decimal range; `step` names the metric being computed.
    #[error("Arithmetic overflow computing {step}")]
    Overflow { step: &'static str },
}

#[derive(Debug, Error)]
pub enum TsvYieldError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Export error: {0}")]
    Export(String),
}

impl From<std::io::Error> for TsvYieldError {
    fn from(e: std::io::Error) -> Self {
        TsvYieldError::Export(e.to_string())
    }
}

#[cfg(feature = "export")]
impl From<csv::Error> for TsvYieldError {
    fn from(e: csv::Error) -> Self {
        TsvYieldError::Export(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_fixed() {
        assert_eq!(
            ValidationError::InvalidAmounts(AmountIssue::SellBelowBuy).to_string(),
            "Sell amount should be greater than Buy amount"
        );
        assert_eq!(
            ValidationError::InvalidAmounts(AmountIssue::NonPositiveBuy).to_string(),
            "Buy amount must be greater than zero"
        );
        assert_eq!(
            ValidationError::InvalidCreditDays.to_string(),
            "Credit days cannot exceed 365"
        );
        assert_eq!(
            ValidationError::InvalidMargin.to_string(),
            "Desired profit margin must be greater than 0% and less than 100%"
        );
        assert_eq!(
            ValidationError::Overflow { step: "tax_amount" }.to_string(),
            "Arithmetic overflow computing tax_amount"
        );
    }

    #[test]
    fn test_validation_error_is_transparent_in_crate_error() {
        let err: TsvYieldError = ValidationError::InvalidCreditDays.into();
        assert_eq!(err.to_string(), "Credit days cannot exceed 365");
        assert!(matches!(
            err,
            TsvYieldError::Validation(ValidationError::InvalidCreditDays)
        ));
    }
}
