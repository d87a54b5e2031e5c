use serde_json::Value;

use tsv_yield_core::export::format_2dp;

use super::metrics_of;

/// Print just the profit after tax, to 2 decimals.
pub fn print_minimal(value: &Value) {
    match metrics_of(value) {
        Some(metrics) => println!("{}", format_2dp(metrics.profit_after_tax)),
        None => println!("{}", value),
    }
}
