//! Trade financing yield -- profit, financing cost and break-even price for a
//! single buy/sell transaction with credit extended to the customer and
//! credit availed from the vendor.
//!
//! Interest accrues on an actual/365 basis at a single overdraft rate shared
//! by both legs. Percent inputs are in points (12 = 12%).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{AmountIssue, ValidationError};
use crate::types::{with_metadata, ComputationOutput, Days, Money, Percent};
use crate::TsvYieldResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Day-count basis for overdraft interest.
pub const DAYS_IN_YEAR: Decimal = dec!(365);
/// Longest credit tenor accepted on either leg.
pub const MAX_CREDIT_DAYS: Decimal = dec!(365);
const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// The ten inputs of a yield calculation.
///
/// Missing fields deserialize to the reference scenario, so a partial JSON
/// document only needs to name what differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldInput {
    /// Purchase price paid to the vendor.
    pub buy: Money,
    /// Sale price charged to the customer.
    pub sell: Money,
    /// Receivable balance financed for the customer.
    pub credit_to_customer: Money,
    /// Tenor of the receivable, in days.
    pub days_credit_given: Days,
    /// Payable balance financed by the vendor.
    pub credit_from_vendor: Money,
    /// Tenor of the payable, in days.
    pub days_credit_availed: Days,
    /// Annual overdraft rate, shared by both legs.
    pub bank_interest: Percent,
    /// Flat costs added to the break-even basis.
    pub additional_costs: Money,
    /// Tax rate applied to profit after interest.
    pub tax_rate: Percent,
    /// Target margin for the break-even price, strictly between 0 and 100.
    pub desired_profit_margin: Percent,
}

impl Default for YieldInput {
    fn default() -> Self {
        Self {
            buy: dec!(100000),
            sell: dec!(110000),
            credit_to_customer: dec!(110000),
            days_credit_given: dec!(30),
            credit_from_vendor: dec!(45000),
            days_credit_availed: dec!(40),
            bank_interest: dec!(12),
            additional_costs: Decimal::ZERO,
            tax_rate: dec!(20),
            desired_profit_margin: dec!(20),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The eight reported metrics. Field order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldMetrics {
    pub profit_before_interest: Money,
    /// Percent of buy.
    pub yield_before_interest: Percent,
    pub net_interest: Money,
    pub profit_after_interest: Money,
    /// Percent of buy.
    pub yield_after_interest: Percent,
    pub tax_amount: Money,
    pub profit_after_tax: Money,
    pub break_even_sell_price: Money,
}

/// Names of the reported metrics, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ProfitBeforeInterest,
    YieldBeforeInterest,
    NetInterest,
    ProfitAfterInterest,
    YieldAfterInterest,
    TaxAmount,
    ProfitAfterTax,
    BreakEvenSellPrice,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::ProfitBeforeInterest,
        Metric::YieldBeforeInterest,
        Metric::NetInterest,
        Metric::ProfitAfterInterest,
        Metric::YieldAfterInterest,
        Metric::TaxAmount,
        Metric::ProfitAfterTax,
        Metric::BreakEvenSellPrice,
    ];

    /// Wire name, as used for the "Metric" column of exports.
    pub fn key(self) -> &'static str {
        match self {
            Metric::ProfitBeforeInterest => "profit_before_interest",
            Metric::YieldBeforeInterest => "yield_before_interest",
            Metric::NetInterest => "net_interest",
            Metric::ProfitAfterInterest => "profit_after_interest",
            Metric::YieldAfterInterest => "yield_after_interest",
            Metric::TaxAmount => "tax_amount",
            Metric::ProfitAfterTax => "profit_after_tax",
            Metric::BreakEvenSellPrice => "break_even_sell_price",
        }
    }

    /// Human-readable label for tables and charts.
    pub fn label(self) -> &'static str {
        match self {
            Metric::ProfitBeforeInterest => "Profit Before Interest",
            Metric::YieldBeforeInterest => "Yield Before Interest (%)",
            Metric::NetInterest => "Net Interest",
            Metric::ProfitAfterInterest => "Profit After Interest",
            Metric::YieldAfterInterest => "Yield After Interest (%)",
            Metric::TaxAmount => "Tax Amount",
            Metric::ProfitAfterTax => "Profit After Tax",
            Metric::BreakEvenSellPrice => "Break-even Sell Price",
        }
    }
}

impl YieldMetrics {
    pub fn get(&self, metric: Metric) -> Money {
        match metric {
            Metric::ProfitBeforeInterest => self.profit_before_interest,
            Metric::YieldBeforeInterest => self.yield_before_interest,
            Metric::NetInterest => self.net_interest,
            Metric::ProfitAfterInterest => self.profit_after_interest,
            Metric::YieldAfterInterest => self.yield_after_interest,
            Metric::TaxAmount => self.tax_amount,
            Metric::ProfitAfterTax => self.profit_after_tax,
            Metric::BreakEvenSellPrice => self.break_even_sell_price,
        }
    }

    /// `(metric, value)` pairs in display order.
    pub fn rows(&self) -> impl Iterator<Item = (Metric, Money)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// Intermediate financing figures that are not part of the reported metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingBreakdown {
    /// Interest carried on the receivable.
    pub interest_invoice: Money,
    /// Interest saved on the payable.
    pub interest_credit: Money,
    /// Buy + additional costs + net interest.
    pub total_costs: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Check the input against the calculator's rules.
///
/// Rules run in a fixed order and the first failure wins:
/// sell below buy, credit days above 365, margin outside (0, 100), and
/// finally a non-positive buy amount.
pub fn validate(input: &YieldInput) -> Result<(), ValidationError> {
    if input.sell < input.buy {
        return Err(ValidationError::InvalidAmounts(AmountIssue::SellBelowBuy));
    }
    if input.days_credit_given > MAX_CREDIT_DAYS || input.days_credit_availed > MAX_CREDIT_DAYS {
        return Err(ValidationError::InvalidCreditDays);
    }
    if input.desired_profit_margin <= Decimal::ZERO || input.desired_profit_margin >= HUNDRED {
        return Err(ValidationError::InvalidMargin);
    }
    if input.buy <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmounts(AmountIssue::NonPositiveBuy));
    }
    Ok(())
}

/// Interest accrued on one financing leg.
///
/// Fails with [`ValidationError::Overflow`] when the product leaves the
/// Decimal range.
pub fn interest_accrual(
    amount: Money,
    bank_interest: Percent,
    days: Days,
) -> Result<Money, ValidationError> {
    checked(
        bank_interest
            .checked_div(HUNDRED)
            .and_then(|rate| amount.checked_mul(rate))
            .and_then(|v| v.checked_mul(days))
            .and_then(|v| v.checked_div(DAYS_IN_YEAR)),
        "interest",
    )
}

/// Receivable and payable interest plus the break-even cost basis.
pub fn financing_breakdown(input: &YieldInput) -> Result<FinancingBreakdown, ValidationError> {
    let interest_invoice = interest_accrual(
        input.credit_to_customer,
        input.bank_interest,
        input.days_credit_given,
    )?;
    let interest_credit = interest_accrual(
        input.credit_from_vendor,
        input.bank_interest,
        input.days_credit_availed,
    )?;
    let net_interest = checked(interest_invoice.checked_sub(interest_credit), "net_interest")?;
    let total_costs = checked(
        input
            .buy
            .checked_add(input.additional_costs)
            .and_then(|v| v.checked_add(net_interest)),
        "total_costs",
    )?;
    Ok(FinancingBreakdown {
        interest_invoice,
        interest_credit,
        total_costs,
    })
}

/// Compute the yield metrics for a validated transaction.
///
/// Pure: no I/O and no rounding. Inputs are checked with [`validate`] first
/// and nothing is computed when a rule fails. Every step uses checked
/// arithmetic, so values that leave the Decimal range are reported as
/// [`ValidationError::Overflow`].
pub fn compute_yield(input: &YieldInput) -> Result<YieldMetrics, ValidationError> {
    validate(input)?;

    let profit_before_interest =
        checked(input.sell.checked_sub(input.buy), "profit_before_interest")?;
    let yield_before_interest = checked(
        percent_of(profit_before_interest, input.buy),
        "yield_before_interest",
    )?;

    let financing = financing_breakdown(input)?;
    let net_interest = checked(
        financing
            .interest_invoice
            .checked_sub(financing.interest_credit),
        "net_interest",
    )?;

    let profit_after_interest = checked(
        profit_before_interest.checked_sub(net_interest),
        "profit_after_interest",
    )?;
    let yield_after_interest = checked(
        percent_of(profit_after_interest, input.buy),
        "yield_after_interest",
    )?;
    let tax_amount = checked(
        input
            .tax_rate
            .checked_div(HUNDRED)
            .and_then(|rate| profit_after_interest.checked_mul(rate)),
        "tax_amount",
    )?;
    let profit_after_tax = checked(
        profit_after_interest.checked_sub(tax_amount),
        "profit_after_tax",
    )?;

    // margin is inside (0, 100), so the divisor is positive
    let keep = Decimal::ONE - input.desired_profit_margin / HUNDRED;
    let break_even_sell_price = checked(
        financing.total_costs.checked_div(keep),
        "break_even_sell_price",
    )?;

    Ok(YieldMetrics {
        profit_before_interest,
        yield_before_interest,
        net_interest,
        profit_after_interest,
        yield_after_interest,
        tax_amount,
        profit_after_tax,
        break_even_sell_price,
    })
}

/// Positional form of [`compute_yield`].
#[allow(clippy::too_many_arguments)]
pub fn compute(
    buy: Money,
    sell: Money,
    credit_to_customer: Money,
    days_credit_given: Days,
    credit_from_vendor: Money,
    days_credit_availed: Days,
    bank_interest: Percent,
    additional_costs: Money,
    tax_rate: Percent,
    desired_profit_margin: Percent,
) -> Result<YieldMetrics, ValidationError> {
    compute_yield(&YieldInput {
        buy,
        sell,
        credit_to_customer,
        days_credit_given,
        credit_from_vendor,
        days_credit_availed,
        bank_interest,
        additional_costs,
        tax_rate,
        desired_profit_margin,
    })
}

/// Compute the yield metrics wrapped in the standard output envelope.
///
/// Validation failures surface as [`crate::TsvYieldError::Validation`].
/// Unusual but accepted inputs produce warnings instead of errors.
pub fn calculate_yield(input: &YieldInput) -> TsvYieldResult<ComputationOutput<YieldMetrics>> {
    let start = Instant::now();

    let metrics = compute_yield(input)?;
    let financing = financing_breakdown(input)?;
    let warnings = advisory_warnings(input, &metrics);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Trade financing yield -- overdraft interest on receivable and payable legs, actual/365 basis",
        &serde_json::json!({
            "day_count": "365",
            "input": input,
            "interest_invoice": financing.interest_invoice.to_string(),
            "interest_credit": financing.interest_credit.to_string(),
            "total_costs": financing.total_costs.to_string(),
        }),
        warnings,
        elapsed,
        metrics,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn checked(value: Option<Decimal>, step: &'static str) -> Result<Decimal, ValidationError> {
    value.ok_or(ValidationError::Overflow { step })
}

/// `part / whole * 100`
fn percent_of(part: Money, whole: Money) -> Option<Percent> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
}

fn advisory_warnings(input: &YieldInput, metrics: &YieldMetrics) -> Vec<String> {
    let mut warnings = Vec::new();

    let negatives = [
        ("credit_to_customer", input.credit_to_customer),
        ("days_credit_given", input.days_credit_given),
        ("credit_from_vendor", input.credit_from_vendor),
        ("days_credit_availed", input.days_credit_availed),
        ("bank_interest", input.bank_interest),
        ("additional_costs", input.additional_costs),
        ("tax_rate", input.tax_rate),
    ];
    for (field, value) in negatives {
        if value < Decimal::ZERO {
            warnings.push(format!("{field} is negative ({value})"));
        }
    }

    if metrics.net_interest < Decimal::ZERO {
        warnings.push(
            "Net interest is negative: vendor credit saves more than customer credit costs".into(),
        );
    }
    if metrics.profit_after_interest < Decimal::ZERO {
        warnings.push("Financing cost exceeds gross profit: profit after interest is negative".into());
    }
    if input.sell < metrics.break_even_sell_price {
        warnings.push(format!(
            "Sell amount is below the break-even price for a {}% margin",
            input.desired_profit_margin
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TsvYieldError;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, what: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff < tol,
            "{} should be ~{}, got {}",
            what,
            expected,
            actual
        );
    }

    // -----------------------------------------------------------------------
    // 1. Reference scenario
    // -----------------------------------------------------------------------
    #[test]
    fn test_reference_scenario() {
        let m = compute_yield(&YieldInput::default()).unwrap();

        assert_eq!(m.profit_before_interest, dec!(10000));
        assert_eq!(m.yield_before_interest, dec!(10));
        assert_close(m.net_interest, dec!(493.15), dec!(0.01), "net_interest");
        assert_close(m.profit_after_interest, dec!(9506.85), dec!(0.01), "profit_after_interest");
        assert_close(m.yield_after_interest, dec!(9.51), dec!(0.01), "yield_after_interest");
        assert_close(m.tax_amount, dec!(1901.37), dec!(0.01), "tax_amount");
        assert_close(m.profit_after_tax, dec!(7605.48), dec!(0.01), "profit_after_tax");
        assert_close(m.break_even_sell_price, dec!(125616.44), dec!(0.01), "break_even_sell_price");
    }

    #[test]
    fn test_reference_financing_breakdown() {
        let f = financing_breakdown(&YieldInput::default()).unwrap();
        assert_close(f.interest_invoice, dec!(1084.93), dec!(0.01), "interest_invoice");
        assert_close(f.interest_credit, dec!(591.78), dec!(0.01), "interest_credit");
        assert_close(f.total_costs, dec!(100493.15), dec!(0.01), "total_costs");
    }

    // -----------------------------------------------------------------------
    // 2. Validation order
    // -----------------------------------------------------------------------
    #[test]
    fn test_amount_rule_wins_over_later_rules() {
        let input = YieldInput {
            sell: dec!(1),
            days_credit_given: dec!(400),
            desired_profit_margin: dec!(0),
            ..YieldInput::default()
        };
        assert_eq!(
            validate(&input),
            Err(ValidationError::InvalidAmounts(AmountIssue::SellBelowBuy))
        );
    }

    #[test]
    fn test_credit_days_rule_wins_over_margin_rule() {
        let input = YieldInput {
            days_credit_availed: dec!(366),
            desired_profit_margin: dec!(100),
            ..YieldInput::default()
        };
        assert_eq!(validate(&input), Err(ValidationError::InvalidCreditDays));
    }

    #[test]
    fn test_margin_rule_wins_over_buy_rule() {
        let input = YieldInput {
            buy: Decimal::ZERO,
            sell: Decimal::ZERO,
            desired_profit_margin: dec!(100),
            ..YieldInput::default()
        };
        assert_eq!(validate(&input), Err(ValidationError::InvalidMargin));
    }

    #[test]
    fn test_zero_buy_is_rejected_instead_of_dividing() {
        let input = YieldInput {
            buy: Decimal::ZERO,
            ..YieldInput::default()
        };
        assert_eq!(
            compute_yield(&input),
            Err(ValidationError::InvalidAmounts(AmountIssue::NonPositiveBuy))
        );
    }

    #[test]
    fn test_negative_buy_is_rejected() {
        let input = YieldInput {
            buy: dec!(-500),
            sell: dec!(100),
            ..YieldInput::default()
        };
        assert_eq!(
            compute_yield(&input),
            Err(ValidationError::InvalidAmounts(AmountIssue::NonPositiveBuy))
        );
    }

    #[test]
    fn test_tiny_buy_overflows_yield_instead_of_panicking() {
        // 100000 / 1e-28 is far outside the Decimal range
        let input = YieldInput {
            buy: dec!(0.0000000000000000000000000001),
            sell: dec!(100000),
            ..YieldInput::default()
        };
        assert_eq!(
            compute_yield(&input),
            Err(ValidationError::Overflow {
                step: "yield_before_interest"
            })
        );
    }

    #[test]
    fn test_huge_credit_overflows_interest_instead_of_panicking() {
        let input = YieldInput {
            credit_to_customer: Decimal::MAX,
            ..YieldInput::default()
        };
        assert_eq!(
            compute_yield(&input),
            Err(ValidationError::Overflow { step: "interest" })
        );
        assert!(matches!(
            calculate_yield(&input),
            Err(TsvYieldError::Validation(ValidationError::Overflow { .. }))
        ));
    }

    #[test]
    fn test_interest_accrual_overflow() {
        assert_eq!(
            interest_accrual(Decimal::MAX, dec!(20), dec!(365)),
            Err(ValidationError::Overflow { step: "interest" })
        );
        assert_eq!(
            interest_accrual(dec!(36500), dec!(10), dec!(365)),
            Ok(dec!(3650))
        );
    }

    // -----------------------------------------------------------------------
    // 3. Positional contract matches struct form
    // -----------------------------------------------------------------------
    #[test]
    fn test_positional_compute_matches_struct_form() {
        let input = YieldInput::default();
        let positional = compute(
            input.buy,
            input.sell,
            input.credit_to_customer,
            input.days_credit_given,
            input.credit_from_vendor,
            input.days_credit_availed,
            input.bank_interest,
            input.additional_costs,
            input.tax_rate,
            input.desired_profit_margin,
        )
        .unwrap();
        assert_eq!(positional, compute_yield(&input).unwrap());
    }

    // -----------------------------------------------------------------------
    // 4. Envelope
    // -----------------------------------------------------------------------
    #[test]
    fn test_envelope_metadata_and_assumptions() {
        let out = calculate_yield(&YieldInput::default()).unwrap();
        assert!(out.methodology.contains("actual/365"));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert!(!out.metadata.version.is_empty());
        assert_eq!(out.assumptions["day_count"], "365");
        assert!(out.assumptions.get("interest_invoice").is_some());
    }

    #[test]
    fn test_envelope_surfaces_validation_error() {
        let input = YieldInput {
            sell: dec!(99999),
            ..YieldInput::default()
        };
        match calculate_yield(&input) {
            Err(TsvYieldError::Validation(ValidationError::InvalidAmounts(
                AmountIssue::SellBelowBuy,
            ))) => {}
            other => panic!("Expected InvalidAmounts, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_scenario_warns_below_break_even() {
        // 110,000 sell vs ~125,616 break-even at a 20% margin
        let out = calculate_yield(&YieldInput::default()).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("break-even")));
        assert!(!out.warnings.iter().any(|w| w.contains("Net interest is negative")));
    }

    #[test]
    fn test_negative_net_interest_warning() {
        let input = YieldInput {
            credit_to_customer: Decimal::ZERO,
            ..YieldInput::default()
        };
        let out = calculate_yield(&input).unwrap();
        assert!(out.result.net_interest < Decimal::ZERO);
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("Net interest is negative")));
    }

    #[test]
    fn test_negative_inputs_are_accepted_with_warning() {
        let input = YieldInput {
            days_credit_given: dec!(-10),
            ..YieldInput::default()
        };
        let out = calculate_yield(&input).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("days_credit_given is negative")));
    }

    // -----------------------------------------------------------------------
    // 5. Metric ordering and serde
    // -----------------------------------------------------------------------
    #[test]
    fn test_rows_follow_display_order() {
        let m = compute_yield(&YieldInput::default()).unwrap();
        let keys: Vec<&str> = m.rows().map(|(metric, _)| metric.key()).collect();
        assert_eq!(
            keys,
            vec![
                "profit_before_interest",
                "yield_before_interest",
                "net_interest",
                "profit_after_interest",
                "yield_after_interest",
                "tax_amount",
                "profit_after_tax",
                "break_even_sell_price",
            ]
        );
    }

    #[test]
    fn test_serialized_metrics_preserve_field_order() {
        let m = compute_yield(&YieldInput::default()).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let mut last = 0;
        for metric in Metric::ALL {
            let pos = json.find(&format!("\"{}\"", metric.key())).unwrap();
            assert!(pos >= last, "{} out of order", metric.key());
            last = pos;
        }
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let input: YieldInput = serde_json::from_str(r#"{"sell": "120000"}"#).unwrap();
        assert_eq!(input.sell, dec!(120000));
        assert_eq!(input.buy, dec!(100000));
        assert_eq!(input.desired_profit_margin, dec!(20));
    }
}
