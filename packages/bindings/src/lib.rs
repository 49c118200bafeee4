use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use mortgage_engine_core::{deal, payments, pipeline, preapproval, rehab};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn decode<T: DeserializeOwned>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn encode<T: Serialize>(output: &T) -> NapiResult<String> {
    serde_json::to_string(output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_payment_breakdown(input_json: String) -> NapiResult<String> {
    let input: payments::math::PaymentInput = decode(&input_json)?;
    encode(&payments::math::payment_breakdown(&input))
}

#[napi]
pub fn build_scenario(input_json: String) -> NapiResult<String> {
    let input: payments::scenario::ScenarioInput = decode(&input_json)?;
    encode(&payments::scenario::build_scenario(&input))
}

/// Takes a JSON array of scenarios; the first is the baseline.
#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let inputs: Vec<payments::scenario::ScenarioInput> = decode(&input_json)?;
    encode(&payments::scenario::compare_scenarios(&inputs))
}

#[napi]
pub fn price_loan(input_json: String) -> NapiResult<String> {
    let input: payments::pricing::PricingInput = decode(&input_json)?;
    encode(&payments::pricing::price_loan(&input))
}

#[derive(Deserialize)]
struct QuoteRequest {
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    term_years: Option<u32>,
}

#[napi]
pub fn quick_quote(input_json: String) -> NapiResult<String> {
    let request: QuoteRequest = decode(&input_json)?;
    encode(&payments::pricing::quote(request.amount, request.term_years))
}

// ---------------------------------------------------------------------------
// Preapproval
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_preapproval(input_json: String) -> NapiResult<String> {
    let input: preapproval::PreapprovalInput = decode(&input_json)?;
    encode(&preapproval::assess_preapproval(&input))
}

#[napi]
pub fn preapproval_letter(input_json: String) -> NapiResult<String> {
    let input: preapproval::LetterInput = decode(&input_json)?;
    let today = chrono::Local::now().date_naive();
    encode(&preapproval::build_letter(&input, today))
}

// ---------------------------------------------------------------------------
// Rehab
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_rehab(input_json: String) -> NapiResult<String> {
    let input: rehab::RehabInput = decode(&input_json)?;
    encode(&rehab::analyze_rehab(&input))
}

#[napi]
pub fn optimize_rehab(input_json: String) -> NapiResult<String> {
    let input: rehab::RehabOptimizeInput = decode(&input_json)?;
    encode(&rehab::optimize_rehab(&input))
}

// ---------------------------------------------------------------------------
// Deal workspace
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    let input: deal::DealInput = decode(&input_json)?;
    encode(&deal::analyze_deal(&input))
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_progress(input_json: String) -> NapiResult<String> {
    let file: mortgage_engine_core::records::LoanFile = decode(&input_json)?;
    encode(&pipeline::progress_report(&file))
}

#[napi]
pub fn engagement_score(input_json: String) -> NapiResult<String> {
    let input: pipeline::EngagementInput = decode(&input_json)?;
    encode(&pipeline::score_engagement(&input))
}
