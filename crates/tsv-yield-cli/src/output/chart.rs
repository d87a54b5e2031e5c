use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use tsv_yield_core::export::format_2dp;
use tsv_yield_core::yield_calc::{Metric, YieldMetrics};

use super::metrics_of;

const BAR_WIDTH: usize = 40;
const POSITIVE: char = '█';
const NEGATIVE: char = '░';

/// Print the metrics as a horizontal bar chart.
pub fn print_chart(value: &Value) {
    match metrics_of(value) {
        Some(metrics) => print!("{}", render_chart(&metrics)),
        None => println!("{}", value),
    }
}

/// One bar per metric, scaled to the largest absolute value, each labelled
/// with its value to 2 decimals. Negative values use a lighter bar.
pub fn render_chart(metrics: &YieldMetrics) -> String {
    let label_width = Metric::ALL
        .iter()
        .map(|m| m.label().len())
        .max()
        .unwrap_or(0);
    let largest = metrics
        .rows()
        .map(|(_, v)| v.abs())
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut out = String::from("Yield Calculation Results\n\n");
    for (metric, value) in metrics.rows() {
        let len = bar_len(value, largest);
        let glyph = if value.is_sign_negative() { NEGATIVE } else { POSITIVE };
        let bar: String = std::iter::repeat(glyph).take(len).collect();
        out.push_str(&format!(
            "{:<label_width$} | {:<BAR_WIDTH$} {}\n",
            metric.label(),
            bar,
            format_2dp(value),
        ));
    }
    out
}

fn bar_len(value: Decimal, largest: Decimal) -> usize {
    if largest.is_zero() {
        return 0;
    }
    let scaled = value.abs() / largest * Decimal::from(BAR_WIDTH as u64);
    let len = scaled.round().to_usize().unwrap_or(0);
    // Keep non-zero values visible.
    if len == 0 && !value.is_zero() {
        1
    } else {
        len
    }
}
