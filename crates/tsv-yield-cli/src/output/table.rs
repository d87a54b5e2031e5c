use serde_json::Value;
use tabled::{builder::Builder, Table};

use tsv_yield_core::export::format_2dp;
use tsv_yield_core::yield_calc::YieldMetrics;

use super::{metrics_of, warnings_of};

/// Format output as a labelled two-column table using the tabled crate.
pub fn print_table(value: &Value) {
    match metrics_of(value) {
        Some(metrics) => {
            println!("{}", render_table(&metrics));
            print_notes(value);
        }
        None => println!("{}", value),
    }
}

/// Metric labels with values to 2 decimals, in display order.
pub fn render_table(metrics: &YieldMetrics) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value"]);
    for (metric, value) in metrics.rows() {
        builder.push_record([metric.label().to_string(), format_2dp(value)]);
    }
    Table::from(builder).to_string()
}

fn print_notes(envelope: &Value) {
    let warnings = warnings_of(envelope);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in warnings {
            println!("  - {}", w);
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_envelope;

    #[test]
    fn test_table_uses_labels_and_two_decimals() {
        let metrics = metrics_of(&sample_envelope()).unwrap();
        let table = render_table(&metrics);
        assert!(table.contains("Profit Before Interest"));
        assert!(table.contains("10000.00"));
        assert!(table.contains("Break-even Sell Price"));
        assert!(table.contains("125616.44"));
        assert!(!table.contains("profit_before_interest"));
    }
}
