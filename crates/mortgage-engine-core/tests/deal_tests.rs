use mortgage_engine_core::deal::{analyze_deal, DealInput};
use mortgage_engine_core::rehab::{analyze_rehab, RehabInput, Strategy as Exit};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

// ===========================================================================
// Workspace JSON
// ===========================================================================

#[test]
fn test_deal_from_workspace_json() {
    let input: DealInput = serde_json::from_value(json!({
        "form": {
            "purchase_price": "",
            "holding_months": "4",
            "monthly_holding_cost": "$850",
            "interest_rate": "0.12",
            "nightly_rate": "n/a"
        },
        "comps": {
            "property": { "price": "180,000" },
            "resale_comps": [{ "price": 255000 }, { "price": 265000 }, { "price": 245000 }],
            "rental_comps": [{ "rent": 1750 }, { "rent": 1850 }],
            "rehab_summary": { "total": 30000 }
        }
    }))
    .unwrap();

    let out = analyze_deal(&input);
    let flip = &out.result.flip;
    assert_eq!(flip.purchase_price, dec!(180000));
    assert_eq!(flip.arv, dec!(255000));
    assert_eq!(flip.rehab_total, dec!(30000));
    assert_eq!(flip.holding_cost, dec!(3400));
    // 144000 loan at 12% for 4 months
    assert_eq!(flip.interest_cost, dec!(5760));

    // upper middle of two rental comps
    assert_eq!(out.result.rental.monthly_rent, dec!(1850));
    // 1850 * 1.6 / 30 = 98.666...
    assert_eq!(out.result.airbnb.nightly_rate, dec!(98.67));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_rehab_estimate_feeds_flip_budget() {
    let rehab: RehabInput = serde_json::from_value(json!({
        "sqft": 1500,
        "scope": "medium",
        "items": { "kitchen": "medium" }
    }))
    .unwrap();
    let estimate = analyze_rehab(&rehab).result.estimate;

    let deal: DealInput = serde_json::from_value(json!({
        "form": { "purchase_price": 150000, "arv": 260000 },
        "comps": { "rehab_summary": serde_json::to_value(&estimate).unwrap() }
    }))
    .unwrap();
    let out = analyze_deal(&deal);
    assert_eq!(out.result.flip.rehab_total, estimate.total);
}

#[test]
fn test_strong_rental_beats_thin_flip() {
    let input: DealInput = serde_json::from_value(json!({
        "form": {
            "purchase_price": 100000,
            "arv": 115000,
            "rehab_total": 5000,
            "monthly_rent": 2200,
            "nightly_rate": 90,
            "occupancy_rate": 0.4
        }
    }))
    .unwrap();
    let rec = analyze_deal(&input).result.recommendation;
    assert!(rec.scores.flip < Decimal::ZERO);
    assert_eq!(rec.best, Exit::Rental);
}

// ===========================================================================
// Properties
// ===========================================================================

fn amount() -> impl Strategy<Value = Decimal> {
    (0u64..2_000_000).prop_map(Decimal::from)
}

proptest! {
    #[test]
    fn prop_best_strategy_has_top_score(
        price in amount(),
        arv in amount(),
        rehab in (0u64..200_000).prop_map(Decimal::from),
        rent in (0u64..10_000).prop_map(Decimal::from),
        nightly in (0u64..600).prop_map(Decimal::from),
    ) {
        let input: DealInput = serde_json::from_value(json!({
            "form": {
                "purchase_price": price,
                "arv": arv,
                "rehab_total": rehab,
                "monthly_rent": rent,
                "nightly_rate": nightly
            }
        }))
        .unwrap();
        let out = analyze_deal(&input).result;
        let s = &out.recommendation.scores;
        let top = s.flip.max(s.rental).max(s.airbnb);
        let best = match out.recommendation.best {
            Exit::Flip => s.flip,
            Exit::Rental => s.rental,
            _ => s.airbnb,
        };
        prop_assert_eq!(best, top);
        prop_assert!(out.flip.total_investment >= out.flip.purchase_price);
        prop_assert!(out.rental.loan_amount >= Decimal::ZERO);
        prop_assert!(out.airbnb.nightly_rate > Decimal::ZERO);
    }
}
