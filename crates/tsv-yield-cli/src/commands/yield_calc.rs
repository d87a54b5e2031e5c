use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use tsv_yield_core::export::{self, PdfOptions};
use tsv_yield_core::yield_calc::{self, YieldInput};

use crate::input;

/// Arguments for the yield calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct YieldArgs {
    /// Buy amount (default 100000)
    #[arg(long)]
    pub buy: Option<Decimal>,

    /// Sell amount (default 110000)
    #[arg(long)]
    pub sell: Option<Decimal>,

    /// Credit amount extended to the customer (default 110000)
    #[arg(long)]
    pub credit_to_customer: Option<Decimal>,

    /// Days of credit given to the customer, at most 365 (default 30)
    #[arg(long)]
    pub days_credit_given: Option<Decimal>,

    /// Credit availed from the vendor (default 45000)
    #[arg(long)]
    pub credit_from_vendor: Option<Decimal>,

    /// Days of vendor credit availed, at most 365 (default 40)
    #[arg(long)]
    pub days_credit_availed: Option<Decimal>,

    /// Bank overdraft interest in percent, 0 to 20 (default 12)
    #[arg(long, alias = "od-rate")]
    pub bank_interest: Option<Decimal>,

    /// Additional costs added to the break-even basis (default 0)
    #[arg(long)]
    pub additional_costs: Option<Decimal>,

    /// Tax rate in percent, 0 to 50 (default 20)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Desired profit margin in percent, between 0 and 100 exclusive (default 20)
    #[arg(long, alias = "margin")]
    pub desired_profit_margin: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Write the results as CSV to this path
    #[arg(long, value_name = "PATH")]
    pub csv_out: Option<PathBuf>,

    /// Write the results as a PDF table to this path
    #[arg(long, value_name = "PATH")]
    pub pdf_out: Option<PathBuf>,
}

impl YieldArgs {
    /// Flags layered over the reference defaults.
    fn to_input(&self) -> YieldInput {
        let d = YieldInput::default();
        YieldInput {
            buy: self.buy.unwrap_or(d.buy),
            sell: self.sell.unwrap_or(d.sell),
            credit_to_customer: self.credit_to_customer.unwrap_or(d.credit_to_customer),
            days_credit_given: self.days_credit_given.unwrap_or(d.days_credit_given),
            credit_from_vendor: self.credit_from_vendor.unwrap_or(d.credit_from_vendor),
            days_credit_availed: self.days_credit_availed.unwrap_or(d.days_credit_availed),
            bank_interest: self.bank_interest.unwrap_or(d.bank_interest),
            additional_costs: self.additional_costs.unwrap_or(d.additional_costs),
            tax_rate: self.tax_rate.unwrap_or(d.tax_rate),
            desired_profit_margin: self.desired_profit_margin.unwrap_or(d.desired_profit_margin),
        }
    }
}

pub fn run_calculate(args: YieldArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let yield_input: YieldInput = if let Some(ref path) = args.input {
        input::file::read_config(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        args.to_input()
    };

    input::bounds::check_widget_bounds(&yield_input)?;
    debug!(?yield_input, "calculating yield");

    let result = yield_calc::calculate_yield(&yield_input)?;

    if let Some(ref path) = args.csv_out {
        let bytes = export::to_csv(&result.result)?;
        fs::write(path, &bytes)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
        info!(path = %path.display(), bytes = bytes.len(), "wrote csv export");
    }

    if let Some(ref path) = args.pdf_out {
        let options = PdfOptions {
            generated_on: Some(Local::now().date_naive()),
            ..PdfOptions::default()
        };
        let bytes = export::to_pdf(&result.result, &options)?;
        fs::write(path, &bytes)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
        info!(path = %path.display(), bytes = bytes.len(), "wrote pdf export");
    }

    Ok(serde_json::to_value(result)?)
}
