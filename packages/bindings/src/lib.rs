use napi::Result as NapiResult;
use napi_derive::napi;

use proforma_core::deal::engine;
use proforma_core::deal::input::DealInput;
use proforma_core::deal::mortgage;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Deal analysis
// ---------------------------------------------------------------------------

/// Run the full deal analysis. Input and output are JSON strings in the
/// shared camelCase wire format; non-finite ratios arrive as null.
#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    let input: DealInput = DealInput::from_json_str(&input_json).map_err(to_napi_error)?;
    let output = engine::analyze_deal(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Check a raw deal input against the schema. Always resolves, returning
/// `{"valid": bool, "violations": [{field, reason}, ...]}` so the form can
/// mark every offending field at once.
#[napi]
pub fn validate_deal(input_json: String) -> NapiResult<String> {
    let raw: serde_json::Value = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let verdict = match DealInput::from_value(&raw) {
        Ok(_) => serde_json::json!({ "valid": true, "violations": [] }),
        Err(violations) => serde_json::json!({ "valid": false, "violations": violations }),
    };
    serde_json::to_string(&verdict).map_err(to_napi_error)
}

/// The documented example deal, used to seed input forms.
#[napi]
pub fn default_deal_input() -> NapiResult<String> {
    serde_json::to_string(&DealInput::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Outstanding principal after `years_elapsed` years of scheduled payments.
#[napi]
pub fn remaining_loan_balance(
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
    years_elapsed: u32,
) -> f64 {
    mortgage::remaining_balance(principal, annual_rate_percent, term_years, years_elapsed)
}
