use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::numeric::lenient;
use crate::types::{round_money, with_metadata, ComputationOutput, Money, RatePct, Ratio};

pub const DEFAULT_TAX_RATE_PCT: RatePct = dec!(1.2);
pub const DEFAULT_INSURANCE_RATE_PCT: RatePct = dec!(0.35);
pub const DEFAULT_PMI_RATE_PCT: RatePct = dec!(0.55);
/// PMI is only charged above this loan-to-value.
pub const PMI_LTV_THRESHOLD: Ratio = dec!(0.80);

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Assumptions
// ---------------------------------------------------------------------------

/// Annual escrow and mortgage-insurance rates used to build a full PITI payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentAssumptions {
    pub tax_rate_pct: RatePct,
    pub insurance_rate_pct: RatePct,
    pub pmi_rate_pct: RatePct,
    pub pmi_ltv_threshold: Ratio,
}

impl Default for PaymentAssumptions {
    fn default() -> Self {
        Self {
            tax_rate_pct: DEFAULT_TAX_RATE_PCT,
            insurance_rate_pct: DEFAULT_INSURANCE_RATE_PCT,
            pmi_rate_pct: DEFAULT_PMI_RATE_PCT,
            pmi_ltv_threshold: PMI_LTV_THRESHOLD,
        }
    }
}

/// Monthly PITI components for one loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub p_and_i: Money,
    pub taxes: Money,
    pub insurance: Money,
    pub pmi: Money,
    pub total_payment: Money,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentInput {
    #[serde(default, deserialize_with = "lenient::money")]
    pub loan_amount: Money,
    /// Note rate in percent.
    #[serde(default, deserialize_with = "lenient::money")]
    pub rate: RatePct,
    #[serde(default, deserialize_with = "lenient::count")]
    pub term_months: u32,
    #[serde(default, deserialize_with = "lenient::money")]
    pub property_value: Money,
    #[serde(default)]
    pub assumptions: Option<PaymentAssumptions>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fixed principal-and-interest payment.
///
/// Returns 0 for a non-positive principal, a zero term or a negative rate.
/// A zero rate amortises straight-line (`principal / term_months`, unrounded).
pub fn monthly_payment(principal: Money, annual_rate_pct: RatePct, term_months: u32) -> Money {
    if principal <= Decimal::ZERO || term_months == 0 || annual_rate_pct < Decimal::ZERO {
        return Decimal::ZERO;
    }

    let n = Decimal::from(term_months);
    if annual_rate_pct.is_zero() {
        return principal / n;
    }

    amortised_payment(principal, annual_rate_pct / dec!(100) / MONTHS_PER_YEAR, term_months)
        .map(round_money)
        .unwrap_or(Decimal::ZERO)
}

/// `P·r / (1 − (1+r)^−n)`, `None` on arithmetic overflow.
fn amortised_payment(principal: Money, monthly_rate: Decimal, n: u32) -> Option<Money> {
    let growth = (Decimal::ONE + monthly_rate).checked_powi(i64::from(n))?;
    let discount = Decimal::ONE.checked_div(growth)?;
    let denominator = Decimal::ONE - discount;
    if denominator.is_zero() {
        return None;
    }
    principal.checked_mul(monthly_rate)?.checked_div(denominator)
}

/// Monthly property-tax escrow; 0 when the property value is missing.
pub fn monthly_taxes(property_value: Money, annual_rate_pct: RatePct) -> Money {
    monthly_share(property_value, annual_rate_pct)
}

/// Monthly hazard-insurance escrow; 0 when the property value is missing.
pub fn monthly_insurance(property_value: Money, annual_rate_pct: RatePct) -> Money {
    monthly_share(property_value, annual_rate_pct)
}

/// Monthly PMI: charged on the loan amount only above 80% LTV.
pub fn monthly_pmi(loan_amount: Money, property_value: Money, annual_rate_pct: RatePct) -> Money {
    monthly_pmi_above(loan_amount, property_value, annual_rate_pct, PMI_LTV_THRESHOLD)
}

fn monthly_pmi_above(
    loan_amount: Money,
    property_value: Money,
    annual_rate_pct: RatePct,
    ltv_threshold: Ratio,
) -> Money {
    if loan_amount <= Decimal::ZERO || property_value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match loan_amount.checked_div(property_value) {
        Some(ltv) if ltv > ltv_threshold => monthly_share(loan_amount, annual_rate_pct),
        _ => Decimal::ZERO,
    }
}

/// `base · rate / 100 / 12`, rounded to cents.
fn monthly_share(base: Money, annual_rate_pct: RatePct) -> Money {
    if base <= Decimal::ZERO || annual_rate_pct <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    base.checked_mul(annual_rate_pct)
        .map(|annual| round_money(annual / dec!(100) / MONTHS_PER_YEAR))
        .unwrap_or(Decimal::ZERO)
}

impl PaymentAssumptions {
    pub fn taxes(&self, property_value: Money) -> Money {
        monthly_taxes(property_value, self.tax_rate_pct)
    }

    pub fn insurance(&self, property_value: Money) -> Money {
        monthly_insurance(property_value, self.insurance_rate_pct)
    }

    pub fn pmi(&self, loan_amount: Money, property_value: Money) -> Money {
        monthly_pmi_above(
            loan_amount,
            property_value,
            self.pmi_rate_pct,
            self.pmi_ltv_threshold,
        )
    }

    /// Full PITI breakdown for a loan.
    pub fn breakdown(
        &self,
        loan_amount: Money,
        annual_rate_pct: RatePct,
        term_months: u32,
        property_value: Money,
    ) -> PaymentBreakdown {
        let p_and_i = monthly_payment(loan_amount, annual_rate_pct, term_months);
        let taxes = self.taxes(property_value);
        let insurance = self.insurance(property_value);
        let pmi = self.pmi(loan_amount, property_value);
        PaymentBreakdown {
            p_and_i,
            taxes,
            insurance,
            pmi,
            total_payment: p_and_i
                .saturating_add(taxes)
                .saturating_add(insurance)
                .saturating_add(pmi),
        }
    }
}

/// PITI breakdown for one loan, wrapped in the standard envelope.
pub fn payment_breakdown(input: &PaymentInput) -> ComputationOutput<PaymentBreakdown> {
    let start = Instant::now();
    let assumptions = input.assumptions.clone().unwrap_or_default();
    let mut warnings = Vec::new();

    if input.loan_amount <= Decimal::ZERO {
        warnings.push("No loan amount; principal and interest is zero.".into());
    }
    if input.term_months == 0 {
        warnings.push("No term; principal and interest is zero.".into());
    }
    if input.rate < Decimal::ZERO {
        warnings.push("Negative rate; principal and interest is zero.".into());
    }

    let breakdown = assumptions.breakdown(
        input.loan_amount,
        input.rate,
        input.term_months,
        input.property_value,
    );

    with_metadata(
        "Fixed-rate amortisation with escrow (PITI) build-up",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        breakdown,
    )
}
