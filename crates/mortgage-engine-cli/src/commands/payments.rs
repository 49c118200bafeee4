use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::payments::math::{self, PaymentInput};
use mortgage_engine_core::payments::pricing::{self, PricingInput};
use mortgage_engine_core::payments::scenario::{self, ScenarioInput};

use crate::input;

/// Arguments for a payment breakdown
#[derive(Args)]
pub struct PaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual note rate in percent (6.5 = 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long, default_value_t = 360)]
    pub term_months: u32,

    /// Property value, for escrow and PMI
    #[arg(long)]
    pub property_value: Option<Decimal>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = match input::optional(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => PaymentInput {
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.term_months,
            property_value: args.property_value.unwrap_or_default(),
            assumptions: None,
        },
    };
    Ok(serde_json::to_value(math::payment_breakdown(&payment_input))?)
}

#[derive(Args)]
pub struct ScenarioArgs {
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_scenario(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario_input: ScenarioInput = input::required(args.input.as_deref(), "a loan scenario")?;
    Ok(serde_json::to_value(scenario::build_scenario(&scenario_input))?)
}

/// Arguments for scenario comparison: a JSON array of scenarios, or an
/// object with a `scenarios` array.
#[derive(Args)]
pub struct CompareArgs {
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: Value = match args.input {
        Some(ref path) => input::file::read_json_value(path)?,
        None => input::stdin::read_stdin()?
            .ok_or("--input <file.json> or stdin required for scenario comparison")?,
    };
    let list = match raw {
        Value::Object(mut map) => map.remove("scenarios").unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    let inputs: Vec<ScenarioInput> = serde_json::from_value(list)?;
    Ok(serde_json::to_value(scenario::compare_scenarios(&inputs))?)
}

/// Arguments for rate and payment pricing
#[derive(Args)]
pub struct PriceArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub credit_score: Option<u32>,

    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    #[arg(long)]
    pub property_value: Option<Decimal>,

    /// Program: conventional, fha, va, usda, dscr, non_qm
    #[arg(long, default_value = "conventional")]
    pub loan_type: String,

    #[arg(long, default_value_t = 30)]
    pub term_years: u32,

    /// Monthly rent, for DSCR
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,
}

pub fn run_price(args: PriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pricing_input: PricingInput = match input::optional(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => PricingInput {
            credit_score: args.credit_score,
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            property_value: args.property_value,
            loan_type: args.loan_type,
            term_years: args.term_years,
            monthly_rent: args.monthly_rent.unwrap_or_default(),
        },
    };
    Ok(serde_json::to_value(pricing::price_loan(&pricing_input))?)
}

#[derive(Args)]
pub struct QuoteArgs {
    /// Loan amount (default 250000)
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in years (default 30)
    #[arg(long)]
    pub term_years: Option<u32>,
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(pricing::quote(args.amount, args.term_years))?)
}
