use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::math::monthly_payment;
use crate::numeric::lenient;
use crate::records::{Borrower, CreditReport, Loan};
use crate::types::*;

/// Illustrative quick-quote rate, in percent.
pub const QUOTE_RATE_PCT: RatePct = dec!(6.5);
pub const QUOTE_DEFAULT_AMOUNT: Money = dec!(250_000);
pub const QUOTE_DEFAULT_TERM_YEARS: u32 = 30;

/// Fallback when the loan type has no entry in the base-rate sheet.
const FALLBACK_BASE_RATE: RatePct = dec!(6.99);

/// Base note rate by program.
const BASE_RATES: [(&str, RatePct); 6] = [
    ("conventional", dec!(6.25)),
    ("fha", dec!(5.75)),
    ("va", dec!(5.65)),
    ("usda", dec!(5.60)),
    ("dscr", dec!(7.50)),
    ("non_qm", dec!(8.25)),
];

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingInput {
    #[serde(default, deserialize_with = "lenient::opt_score")]
    pub credit_score: Option<u32>,
    #[serde(default, deserialize_with = "lenient::money")]
    pub loan_amount: Money,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub property_value: Option<Money>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub loan_type: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub term_years: u32,
    #[serde(default, deserialize_with = "lenient::money")]
    pub monthly_rent: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingOutput {
    pub rate: RatePct,
    pub ltv: Option<Ratio>,
    pub monthly_payment: Money,
    pub dscr: Option<Ratio>,
}

/// Unrounded DTI / LTV inputs shared by every desk (LO, processor, underwriter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtiLtvSnapshot {
    pub front_end_dti: Option<Ratio>,
    pub back_end_dti: Option<Ratio>,
    pub ltv: Option<Ratio>,
    pub income_total: Money,
    pub monthly_debts: Money,
    pub housing_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub loan_type: String,
    pub lender: String,
    pub term: String,
    pub rate: RatePct,
    pub monthly_payment: Money,
}

// ---------------------------------------------------------------------------
// Rate sheet
// ---------------------------------------------------------------------------

/// Estimate a note rate from program, credit score and LTV.
pub fn estimate_rate(credit_score: Option<u32>, ltv: Option<Ratio>, loan_type: &str) -> RatePct {
    let program = loan_type.trim().to_ascii_lowercase();
    let mut rate = BASE_RATES
        .iter()
        .find(|(name, _)| *name == program)
        .map(|(_, r)| *r)
        .unwrap_or(FALLBACK_BASE_RATE);

    if let Some(score) = credit_score.filter(|s| *s > 0) {
        rate += match score {
            s if s < 620 => dec!(1.00),
            s if s < 660 => dec!(0.50),
            s if s < 700 => dec!(0.25),
            s if s > 760 => dec!(-0.25),
            _ => Decimal::ZERO,
        };
    }

    if let Some(ltv) = ltv {
        rate += match ltv {
            l if l > dec!(0.90) => dec!(1.00),
            l if l > dec!(0.80) => dec!(0.50),
            l if l < dec!(0.70) => dec!(-0.25),
            _ => Decimal::ZERO,
        };
    }

    rate.round_dp(3)
}

/// Amortised payment for a term quoted in years.
pub fn calc_payment(amount: Money, rate_pct: RatePct, term_years: u32) -> Money {
    monthly_payment(amount, rate_pct, term_years.saturating_mul(12)).round_dp(2)
}

/// Rent over debt service, 3 dp; undefined without a payment.
pub fn calc_dscr(rent: Money, payment: Money) -> Option<Ratio> {
    if payment.is_zero() {
        return None;
    }
    rent.checked_div(payment).map(|r| r.round_dp(3))
}

/// Unified DTI and LTV calculation over the borrower / loan / credit rows.
pub fn dti_ltv(borrower: &Borrower, loan: Option<&Loan>, credit: Option<&CreditReport>) -> DtiLtvSnapshot {
    let income_total = borrower.total_income();
    let housing_payment = borrower.monthly_housing_payment.unwrap_or_default();
    let monthly_debts = credit.map(|c| c.monthly_debt_total).unwrap_or_default();

    let (front_end_dti, back_end_dti) = if income_total > Decimal::ZERO {
        (
            housing_payment.checked_div(income_total),
            housing_payment
                .saturating_add(monthly_debts)
                .checked_div(income_total),
        )
    } else {
        (None, None)
    };

    let ltv = loan.and_then(|l| match (l.amount, l.known_property_value()) {
        (Some(amount), Some(value)) if !amount.is_zero() => amount.checked_div(value),
        _ => None,
    });

    DtiLtvSnapshot {
        front_end_dti,
        back_end_dti,
        ltv,
        income_total,
        monthly_debts,
        housing_payment,
    }
}

/// Quick commercial quote at the house rate.
pub fn quote(amount: Option<Money>, term_years: Option<u32>) -> Quote {
    let amount = amount.unwrap_or(QUOTE_DEFAULT_AMOUNT);
    let term_years = term_years.unwrap_or(QUOTE_DEFAULT_TERM_YEARS);
    Quote {
        loan_type: "Commercial".into(),
        lender: "CM Loan Services".into(),
        term: format!("{term_years} years"),
        rate: QUOTE_RATE_PCT,
        monthly_payment: calc_payment(amount, QUOTE_RATE_PCT, term_years),
    }
}

/// Rate, payment and DSCR for a prospective loan.
pub fn price_loan(input: &PricingInput) -> ComputationOutput<PricingOutput> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let term_years = if input.term_years == 0 {
        warnings.push(format!("No term supplied; assumed {QUOTE_DEFAULT_TERM_YEARS} years."));
        QUOTE_DEFAULT_TERM_YEARS
    } else {
        input.term_years
    };

    let ltv = input
        .property_value
        .filter(|v| !v.is_zero())
        .and_then(|v| input.loan_amount.checked_div(v));
    if ltv.is_none() {
        warnings.push("No property value; LTV adjustment skipped.".into());
    }

    let rate = estimate_rate(input.credit_score, ltv, &input.loan_type);
    let payment = calc_payment(input.loan_amount, rate, term_years);
    let dscr = if input.monthly_rent > Decimal::ZERO {
        calc_dscr(input.monthly_rent, payment)
    } else {
        None
    };

    let assumptions = serde_json::json!({
        "fallback_base_rate": FALLBACK_BASE_RATE,
        "term_years": term_years,
    });

    with_metadata(
        "Base rate sheet with credit and LTV adjustments",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        PricingOutput {
            rate,
            ltv: ltv.map(|l| l.round_dp(4)),
            monthly_payment: payment,
            dscr,
        },
    )
}
