use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::math::PaymentAssumptions;
use crate::numeric::lenient;
use crate::types::*;

/// Term applied when a scenario is entered without one.
pub const DEFAULT_TERM_MONTHS: u32 = 360;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioInput {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::money")]
    pub loan_amount: Money,
    /// Note rate in percent.
    #[serde(default, deserialize_with = "lenient::money")]
    pub rate: RatePct,
    #[serde(default, deserialize_with = "lenient::count")]
    pub term: u32,
    #[serde(default, deserialize_with = "lenient::money")]
    pub property_value: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<PaymentAssumptions>,
}

/// A fully priced loan scenario. Built once, compared side by side, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanScenario {
    pub title: String,
    pub loan_amount: Money,
    pub rate: RatePct,
    pub term: u32,
    pub property_value: Money,
    pub p_and_i: Money,
    pub taxes: Money,
    pub insurance: Money,
    pub pmi: Money,
    pub total_payment: Money,
    /// Loan-to-value in percent (75.00 = 75%), `None` without a property value.
    pub ltv: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub title: String,
    pub total_payment_delta: Money,
    pub ltv_delta: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenarios: Vec<LoanScenario>,
    pub lowest_payment: Option<String>,
    pub lowest_ltv: Option<String>,
    /// Each scenario measured against the first one.
    pub deltas_vs_baseline: Vec<ScenarioDelta>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl LoanScenario {
    pub fn new(
        title: impl Into<String>,
        loan_amount: Money,
        rate: RatePct,
        term: u32,
        property_value: Money,
    ) -> Self {
        Self::with_assumptions(
            title,
            loan_amount,
            rate,
            term,
            property_value,
            &PaymentAssumptions::default(),
        )
    }

    pub fn with_assumptions(
        title: impl Into<String>,
        loan_amount: Money,
        rate: RatePct,
        term: u32,
        property_value: Money,
        assumptions: &PaymentAssumptions,
    ) -> Self {
        let term = if term == 0 { DEFAULT_TERM_MONTHS } else { term };
        let breakdown = assumptions.breakdown(loan_amount, rate, term, property_value);

        let ltv = if property_value > Decimal::ZERO {
            loan_amount
                .checked_div(property_value)
                .and_then(|r| r.checked_mul(dec!(100)))
                .map(|pct| pct.round_dp(2))
        } else {
            None
        };

        Self {
            title: title.into(),
            loan_amount,
            rate,
            term,
            property_value,
            p_and_i: breakdown.p_and_i,
            taxes: breakdown.taxes,
            insurance: breakdown.insurance,
            pmi: breakdown.pmi,
            total_payment: breakdown.total_payment,
            ltv,
        }
    }

    fn from_input(input: &ScenarioInput) -> Self {
        let assumptions = input.assumptions.clone().unwrap_or_default();
        Self::with_assumptions(
            input.title.clone(),
            input.loan_amount,
            input.rate,
            input.term,
            input.property_value,
            &assumptions,
        )
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price a single scenario.
pub fn build_scenario(input: &ScenarioInput) -> ComputationOutput<LoanScenario> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.term == 0 {
        warnings.push(format!("No term supplied; assumed {DEFAULT_TERM_MONTHS} months."));
    }
    if input.property_value <= Decimal::ZERO {
        warnings.push("No property value; LTV, taxes, insurance and PMI are undefined.".into());
    }

    let scenario = LoanScenario::from_input(input);
    let assumptions = input.assumptions.clone().unwrap_or_default();

    with_metadata(
        "Fixed-rate amortisation with escrow (PITI) build-up",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        scenario,
    )
}

/// Price several scenarios and rank them side by side.
pub fn compare_scenarios(inputs: &[ScenarioInput]) -> ComputationOutput<ScenarioComparison> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if inputs.is_empty() {
        warnings.push("No scenarios supplied.".into());
    }

    let scenarios: Vec<LoanScenario> = inputs.iter().map(LoanScenario::from_input).collect();

    let lowest_payment = scenarios
        .iter()
        .min_by_key(|s| s.total_payment)
        .map(|s| s.title.clone());

    let lowest_ltv = scenarios
        .iter()
        .filter_map(|s| s.ltv.map(|ltv| (ltv, s)))
        .min_by_key(|(ltv, _)| *ltv)
        .map(|(_, s)| s.title.clone());

    let deltas_vs_baseline = match scenarios.first() {
        Some(base) => scenarios
            .iter()
            .map(|s| ScenarioDelta {
                title: s.title.clone(),
                total_payment_delta: s.total_payment.saturating_sub(base.total_payment),
                ltv_delta: match (s.ltv, base.ltv) {
                    (Some(a), Some(b)) => a.checked_sub(b),
                    _ => None,
                },
            })
            .collect(),
        None => Vec::new(),
    };

    let assumptions = serde_json::json!({
        "baseline": "first scenario",
        "ltv_units": "percent",
    });

    with_metadata(
        "Side-by-side PITI scenario comparison",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        ScenarioComparison {
            scenarios,
            lowest_payment,
            lowest_ltv,
            deltas_vs_baseline,
        },
    )
}
