//! Ranges the input form enforces before the calculator sees a value.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tsv_yield_core::yield_calc::YieldInput;
use tsv_yield_core::TsvYieldError;

const MAX_BANK_INTEREST: Decimal = dec!(20);
const MAX_TAX_RATE: Decimal = dec!(50);

/// Reject rates outside the slider ranges of the form: overdraft interest
/// 0 to 20 percent, tax 0 to 50 percent.
pub fn check_widget_bounds(input: &YieldInput) -> Result<(), TsvYieldError> {
    check_range("bank_interest", input.bank_interest, MAX_BANK_INTEREST)?;
    check_range("tax_rate", input.tax_rate, MAX_TAX_RATE)?;
    Ok(())
}

fn check_range(field: &str, value: Decimal, max: Decimal) -> Result<(), TsvYieldError> {
    if value < Decimal::ZERO || value > max {
        return Err(TsvYieldError::InvalidInput {
            field: field.into(),
            reason: format!("must be between 0% and {max}%, got {value}%"),
        });
    }
    Ok(())
}
