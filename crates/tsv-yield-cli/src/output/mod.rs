pub mod chart;
pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;
use tsv_yield_core::yield_calc::YieldMetrics;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
        OutputFormat::Chart => chart::print_chart(value),
    }
}

/// Typed metrics from the `result` field of an output envelope.
pub fn metrics_of(value: &Value) -> Option<YieldMetrics> {
    value
        .get("result")
        .and_then(|r| serde_json::from_value(r.clone()).ok())
}

/// Advisory warnings carried by the envelope.
pub fn warnings_of(value: &Value) -> Vec<&str> {
    value
        .get("warnings")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) fn sample_envelope() -> Value {
    let out = tsv_yield_core::yield_calc::calculate_yield(
        &tsv_yield_core::yield_calc::YieldInput::default(),
    )
    .unwrap();
    serde_json::to_value(out).unwrap()
}
