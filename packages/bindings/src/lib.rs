use napi::bindgen_prelude::Buffer;
use napi::Result as NapiResult;
use napi_derive::napi;

use tsv_yield_core::export::{self, PdfOptions};
use tsv_yield_core::yield_calc::{self, YieldInput, YieldMetrics};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn metrics_from_json(input_json: &str) -> NapiResult<YieldMetrics> {
    let input: YieldInput = serde_json::from_str(input_json).map_err(to_napi_error)?;
    yield_calc::compute_yield(&input).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Yield calculation
// ---------------------------------------------------------------------------

/// Full output envelope as JSON. Validation failures reject with the
/// calculator's message.
#[napi]
pub fn calculate_yield(input_json: String) -> NapiResult<String> {
    let input: YieldInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = yield_calc::calculate_yield(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Reference inputs for pre-filling a form.
#[napi]
pub fn default_yield_input() -> NapiResult<String> {
    serde_json::to_string(&YieldInput::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

#[napi]
pub fn export_yield_csv(input_json: String) -> NapiResult<String> {
    let metrics = metrics_from_json(&input_json)?;
    let bytes = export::to_csv(&metrics).map_err(to_napi_error)?;
    String::from_utf8(bytes).map_err(to_napi_error)
}

#[napi]
pub fn export_yield_pdf(input_json: String) -> NapiResult<Buffer> {
    let metrics = metrics_from_json(&input_json)?;
    let bytes = export::to_pdf(&metrics, &PdfOptions::default()).map_err(to_napi_error)?;
    Ok(bytes.into())
}
