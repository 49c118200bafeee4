use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::lenient;
use crate::rehab::Comps;
use crate::types::*;

// ---------------------------------------------------------------------------
// Deal workspace inputs
// ---------------------------------------------------------------------------

/// Values typed into the deal workspace. Every field is optional; a blank or
/// unparseable entry falls back to the comps or the strategy default.
/// Rates here are decimal fractions (0.08 = 8%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealForm {
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub purchase_price: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub arv: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub rehab_total: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub monthly_rent: Option<Money>,

    // Flip
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub holding_months: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub monthly_holding_cost: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub selling_cost_rate: Option<Ratio>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub points_rate: Option<Ratio>,

    // Shared by flip and rental financing
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub down_payment_rate: Option<Ratio>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub interest_rate: Option<Ratio>,

    // Rental
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub monthly_taxes: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub monthly_insurance: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub monthly_hoa: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub monthly_maintenance: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub vacancy_rate: Option<Ratio>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub management_rate: Option<Ratio>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub term_years: Option<Decimal>,

    // Short-term rental
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub nightly_rate: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub occupancy_rate: Option<Ratio>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub platform_fee_rate: Option<Ratio>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub cleaning_fee_cost: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub avg_stay_nights: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub monthly_utilities: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub monthly_supplies: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResaleComp {
    #[serde(default, deserialize_with = "lenient::money")]
    pub price: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalComp {
    #[serde(default, deserialize_with = "lenient::money")]
    pub rent: Money,
}

/// The `estimate` block of a rehab analysis; only its total is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RehabSummary {
    #[serde(default, deserialize_with = "lenient::money")]
    pub total: Money,
}

/// Market data behind a deal: the rehab comps plus resale and rental comps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealComps {
    #[serde(flatten)]
    pub comps: Comps,
    #[serde(default, deserialize_with = "lenient::list")]
    pub resale_comps: Vec<ResaleComp>,
    #[serde(default, deserialize_with = "lenient::money")]
    pub market_rent_estimate: Money,
    #[serde(default, deserialize_with = "lenient::list")]
    pub rental_comps: Vec<RentalComp>,
    #[serde(default)]
    pub rehab_summary: RehabSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealInput {
    #[serde(default)]
    pub form: DealForm,
    #[serde(default)]
    pub comps: DealComps,
}

// ---------------------------------------------------------------------------
// Resolution: form value, then comps, then zero
// ---------------------------------------------------------------------------

fn positive(value: Option<Money>) -> Option<Money> {
    value.filter(|v| *v > Decimal::ZERO)
}

/// Upper middle of the positive values.
pub fn median_positive(values: impl IntoIterator<Item = Money>) -> Option<Money> {
    let mut values: Vec<Money> = values.into_iter().filter(|v| *v > Decimal::ZERO).collect();
    values.sort();
    values.get(values.len() / 2).copied()
}

impl DealInput {
    pub fn purchase_price(&self) -> Money {
        positive(self.form.purchase_price)
            .or(positive(Some(self.comps.comps.property.price)))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn arv(&self) -> Money {
        positive(self.form.arv)
            .or(positive(Some(self.comps.comps.arv_estimate)))
            .or_else(|| median_positive(self.comps.resale_comps.iter().map(|c| c.price)))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn market_rent(&self) -> Money {
        positive(self.form.monthly_rent)
            .or(positive(Some(self.comps.market_rent_estimate)))
            .or_else(|| median_positive(self.comps.rental_comps.iter().map(|c| c.rent)))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn rehab_total(&self) -> Money {
        positive(self.form.rehab_total)
            .or(positive(Some(self.comps.rehab_summary.total)))
            .unwrap_or(Decimal::ZERO)
    }
}
