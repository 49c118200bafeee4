use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::budgets::*;
use super::inputs::DealInput;
use crate::rehab::Strategy;
use crate::types::*;

/// Rentals covering debt service this well earn a bonus in the comparison.
pub const DSCR_BONUS_THRESHOLD: Ratio = dec!(1.15);
pub const DSCR_BONUS: Money = dec!(5000);
/// Short-term rentals booked below this occupancy take a penalty.
pub const OCCUPANCY_PENALTY_THRESHOLD: Ratio = dec!(0.45);
pub const OCCUPANCY_PENALTY: Money = dec!(3000);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyScores {
    pub flip: Money,
    pub rental: Money,
    pub airbnb: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecommendation {
    pub best: Strategy,
    pub scores: StrategyScores,
    pub notes: BTreeMap<String, String>,
}

/// Scores each exit on one-year dollars: flip profit, a year of rental
/// cashflow, a year of short-term net. Ties go to the earlier strategy in
/// flip, rental, airbnb order.
pub fn recommend_strategy(
    flip: &FlipBudget,
    rental: &RentalBudget,
    airbnb: &AirbnbBudget,
) -> StrategyRecommendation {
    let mut rental_score = rental.net_cashflow.saturating_mul(dec!(12));
    if rental.dscr >= DSCR_BONUS_THRESHOLD {
        rental_score = rental_score.saturating_add(DSCR_BONUS);
    }
    let mut airbnb_score = airbnb.net_monthly.saturating_mul(dec!(12));
    if airbnb.occupancy_rate < OCCUPANCY_PENALTY_THRESHOLD {
        airbnb_score = airbnb_score.saturating_sub(OCCUPANCY_PENALTY);
    }
    let scores = StrategyScores {
        flip: flip.profit,
        rental: rental_score,
        airbnb: airbnb_score,
    };

    let mut best = (Strategy::Flip, scores.flip);
    for candidate in [
        (Strategy::Rental, scores.rental),
        (Strategy::Airbnb, scores.airbnb),
    ] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }

    let notes = [
        ("flip", "Higher profit wins. Watch holding + sell costs."),
        ("rental", "Higher annual cashflow with DSCR bonus."),
        ("airbnb", "High cashflow but occupancy sensitivity."),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    StrategyRecommendation {
        best: best.0,
        scores,
        notes,
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealAnalysis {
    pub flip: FlipBudget,
    pub rental: RentalBudget,
    pub airbnb: AirbnbBudget,
    pub recommendation: StrategyRecommendation,
}

/// All three exit budgets for one property plus the recommended exit.
pub fn analyze_deal(input: &DealInput) -> ComputationOutput<DealAnalysis> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.purchase_price().is_zero() {
        warnings.push("No purchase price; financing figures are zero.".into());
    }
    if input.arv().is_zero() {
        warnings.push("No ARV from the form, comps, or resale comps; flip resale is zero.".into());
    }
    if input.market_rent().is_zero() {
        warnings.push("No market rent; rental income is zero and nightly rate uses the floor.".into());
    }
    if input.rehab_total().is_zero() {
        warnings.push("No rehab total; flip budget assumes no renovation.".into());
    }

    let flip = calculate_flip_budget(input);
    let rental = calculate_rental_budget(input);
    let airbnb = calculate_airbnb_budget(input);
    let recommendation = recommend_strategy(&flip, &rental, &airbnb);
    tracing::debug!(best = ?recommendation.best, "deal strategy scored");

    let assumptions = serde_json::json!({
        "flip": {
            "holding_months": FLIP_HOLDING_MONTHS,
            "selling_cost_rate": FLIP_SELLING_COST_RATE,
            "down_payment_rate": FLIP_DOWN_PAYMENT_RATE,
            "interest_rate": FLIP_INTEREST_RATE,
            "points_rate": FLIP_POINTS_RATE,
        },
        "rental": {
            "vacancy_rate": RENTAL_VACANCY_RATE,
            "management_rate": RENTAL_MANAGEMENT_RATE,
            "down_payment_rate": RENTAL_DOWN_PAYMENT_RATE,
            "interest_rate": RENTAL_INTEREST_RATE,
            "term_years": RENTAL_TERM_YEARS,
        },
        "airbnb": {
            "occupancy_rate": STR_OCCUPANCY_RATE,
            "platform_fee_rate": STR_PLATFORM_FEE_RATE,
            "cleaning_fee": STR_CLEANING_FEE,
            "management_rate": STR_MANAGEMENT_RATE,
            "min_nightly_rate": STR_MIN_NIGHTLY_RATE,
        },
    });

    with_metadata(
        "Flip, long-term rental and short-term rental budgets scored on one-year dollars",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        DealAnalysis {
            flip,
            rental,
            airbnb,
            recommendation,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::inputs::DealForm;
    use rust_decimal::Decimal;

    fn budgets(
        profit: Decimal,
        cashflow: Decimal,
        dscr: Ratio,
        net: Decimal,
        occupancy: Ratio,
    ) -> (FlipBudget, RentalBudget, AirbnbBudget) {
        let input = DealInput::default();
        let mut flip = calculate_flip_budget(&input);
        flip.profit = profit;
        let mut rental = calculate_rental_budget(&input);
        rental.net_cashflow = cashflow;
        rental.dscr = dscr;
        let mut airbnb = calculate_airbnb_budget(&input);
        airbnb.net_monthly = net;
        airbnb.occupancy_rate = occupancy;
        (flip, rental, airbnb)
    }

    #[test]
    fn test_dscr_bonus_lifts_rental() {
        let (f, r, a) = budgets(dec!(10000), dec!(500), dec!(1.15), dec!(0), dec!(0.6));
        let rec = recommend_strategy(&f, &r, &a);
        assert_eq!(rec.scores.rental, dec!(11000));
        assert_eq!(rec.best, Strategy::Rental);

        let (f, r, a) = budgets(dec!(10000), dec!(500), dec!(1.14), dec!(0), dec!(0.6));
        assert_eq!(recommend_strategy(&f, &r, &a).best, Strategy::Flip);
    }

    #[test]
    fn test_low_occupancy_penalised() {
        let (f, r, a) = budgets(dec!(20000), dec!(0), dec!(0), dec!(1800), dec!(0.44));
        let rec = recommend_strategy(&f, &r, &a);
        assert_eq!(rec.scores.airbnb, dec!(18600));
        assert_eq!(rec.best, Strategy::Flip);
    }

    #[test]
    fn test_ties_keep_earlier_strategy() {
        let (f, r, a) = budgets(dec!(12000), dec!(1000), dec!(0), dec!(1000), dec!(0.5));
        assert_eq!(recommend_strategy(&f, &r, &a).best, Strategy::Flip);
        let (f, r, a) = budgets(dec!(0), dec!(1000), dec!(0), dec!(1000), dec!(0.5));
        assert_eq!(recommend_strategy(&f, &r, &a).best, Strategy::Rental);
    }

    #[test]
    fn test_analyze_deal_envelope() {
        let input = DealInput {
            form: DealForm {
                purchase_price: Some(dec!(200000)),
                arv: Some(dec!(300000)),
                rehab_total: Some(dec!(40000)),
                monthly_holding_cost: Some(dec!(1000)),
                monthly_rent: Some(dec!(2000)),
                monthly_taxes: Some(dec!(200)),
                monthly_insurance: Some(dec!(100)),
                nightly_rate: Some(dec!(200)),
                ..Default::default()
            },
            ..Default::default()
        };
        let out = analyze_deal(&input);
        assert!(out.warnings.is_empty());
        assert_eq!(out.result.flip.profit, dec!(18800));
        assert_eq!(out.result.recommendation.scores.airbnb, dec!(16932));
        assert_eq!(out.result.recommendation.best, Strategy::Flip);
        assert_eq!(out.result.recommendation.notes.len(), 3);
        assert_eq!(out.assumptions["rental"]["term_years"], "30");
    }

    #[test]
    fn test_empty_deal_warns() {
        let out = analyze_deal(&DealInput::default());
        assert_eq!(out.warnings.len(), 4);
        assert_eq!(out.result.airbnb.nightly_rate, STR_MIN_NIGHTLY_RATE);
    }
}
