//! CSV and PDF artefacts for a finished yield calculation.

pub mod csv_out;
pub mod pdf;

use rust_decimal::{Decimal, RoundingStrategy};

pub use csv_out::{to_csv, write_csv};
pub use pdf::{to_pdf, PdfOptions, PdfTableBuilder};

/// Default download name for the CSV export.
pub const CSV_FILE_NAME: &str = "yield_calculation_results.csv";
/// Default download name for the PDF export.
pub const PDF_FILE_NAME: &str = "yield_calculation_results.pdf";

/// Display form used by tables, charts and the PDF: two decimals, halves
/// rounded away from zero.
pub fn format_2dp(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_2dp() {
        assert_eq!(format_2dp(dec!(10)), "10.00");
        assert_eq!(format_2dp(dec!(493.150684)), "493.15");
        assert_eq!(format_2dp(dec!(0.125)), "0.13");
        assert_eq!(format_2dp(dec!(-0.125)), "-0.13");
    }
}
