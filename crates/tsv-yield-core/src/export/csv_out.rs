use std::io;

use tracing::debug;

use crate::error::TsvYieldError;
use crate::yield_calc::YieldMetrics;
use crate::TsvYieldResult;

/// Header row of the two-column export.
pub const CSV_HEADER: [&str; 2] = ["Metric", "Value"];

/// Write the metrics as `Metric,Value` rows in display order.
///
/// Values keep full precision; there is no index column.
pub fn write_csv<W: io::Write>(metrics: &YieldMetrics, writer: W) -> TsvYieldResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    let mut rows = 0usize;
    for (metric, value) in metrics.rows() {
        wtr.write_record([metric.key(), &value.to_string()])?;
        rows += 1;
    }
    wtr.flush()?;
    debug!(rows, "wrote yield metrics csv");
    Ok(())
}

/// UTF-8 CSV bytes, ready for download.
pub fn to_csv(metrics: &YieldMetrics) -> TsvYieldResult<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for (metric, value) in metrics.rows() {
        wtr.write_record([metric.key(), &value.to_string()])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| TsvYieldError::Export(e.to_string()))?;
    debug!(bytes = bytes.len(), "rendered yield metrics csv");
    Ok(bytes)
}
