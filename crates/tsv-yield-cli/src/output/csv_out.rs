use serde_json::Value;
use std::io;
use tracing::warn;

use tsv_yield_core::export;

use super::metrics_of;

/// Write the metrics to stdout in the same `Metric,Value` layout as the
/// CSV export.
pub fn print_csv(value: &Value) {
    let Some(metrics) = metrics_of(value) else {
        warn!("output has no yield metrics to write as csv");
        return;
    };
    let stdout = io::stdout();
    if let Err(e) = export::write_csv(&metrics, stdout.lock()) {
        eprintln!("CSV output error: {}", e);
    }
}
