use mortgage_engine_core::rehab::estimate::RISK_MULTIPLE_HEAVY;
use mortgage_engine_core::rehab::{
    analyze_rehab, estimate_cost, optimize_rehab, optimize_to_budget, Level, RehabInput,
    RehabItem, RehabItems, RehabOptimizeInput,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

const BUDGET_ITEMS: [RehabItem; 6] = [
    RehabItem::Kitchen,
    RehabItem::Bathroom,
    RehabItem::Flooring,
    RehabItem::Paint,
    RehabItem::Roof,
    RehabItem::Hvac,
];

fn level_strategy() -> impl Strategy<Value = Level> {
    prop_oneof![Just(Level::Light), Just(Level::Medium), Just(Level::Heavy)]
}

fn items_strategy() -> impl Strategy<Value = RehabItems> {
    prop::collection::vec((0usize..6, prop::option::of(level_strategy())), 0..8).prop_map(|picks| {
        let mut items = RehabItems::new();
        for (idx, level) in picks {
            items.set(BUDGET_ITEMS[idx], level);
        }
        items
    })
}

// ===========================================================================
// Estimator
// ===========================================================================

#[test]
fn test_medium_baseline_without_items() {
    let e = estimate_cost(dec!(1000), Level::Medium, &RehabItems::new());
    assert_eq!(e.total, dec!(30000));
    assert_eq!(e.cost_per_sqft, dec!(30));
}

#[test]
fn test_negative_sqft_is_clamped() {
    let items = RehabItems::new().with(RehabItem::Paint, Level::Light);
    let e = estimate_cost(dec!(-800), Level::Heavy, &items);
    assert_eq!(e.base_rehab, Decimal::ZERO);
    assert_eq!(e.total, dec!(2000));
    assert_eq!(e.cost_per_sqft, Decimal::ZERO);
}

#[test]
fn test_analyze_from_form_json() {
    let input: RehabInput = serde_json::from_value(json!({
        "sqft": "1,200",
        "scope": "bogus",
        "items": { "kitchen": "heavy", "garage": "light", "paint": "" },
        "comps": { "arv_estimate": "300000", "property": { "price": 180000 } },
        "strategy": "rental"
    }))
    .unwrap();

    assert_eq!(input.scope, Level::Medium);
    assert!(input.items.contains(RehabItem::Paint));
    assert_eq!(input.items.level(RehabItem::Paint), None);

    let out = analyze_rehab(&input);
    let a = &out.result;
    assert_eq!(a.estimate.total, dec!(61000));
    assert_eq!(a.estimate.cost_per_sqft, dec!(50.83));
    assert_eq!(a.timeline.total_weeks, dec!(8));
    assert_eq!(a.materials.total_material_cost, dec!(8000));
    assert!(a.risk_flags.is_empty());
    assert_eq!(
        a.notes,
        vec![
            "Medium rehab — balanced upgrades.".to_string(),
            "Kitchen renovation: Heavy.".to_string(),
            "For rentals, use durable, low-maintenance materials.".to_string(),
        ]
    );
}

#[test]
fn test_heavy_gut_job_is_flagged() {
    let input = RehabInput {
        sqft: dec!(900),
        scope: Level::Heavy,
        items: RehabItems::new()
            .with(RehabItem::Kitchen, Level::Heavy)
            .with(RehabItem::Roof, Level::Heavy),
        ..Default::default()
    };
    let out = analyze_rehab(&input);
    assert!(out.result.risk_flags.contains(&RISK_MULTIPLE_HEAVY.to_string()));
    // 8 + 4 + 3 weeks
    assert_eq!(out.result.timeline.total_weeks, dec!(15));
    assert_eq!(out.warnings.len(), 1);
}

// ===========================================================================
// Optimisers
// ===========================================================================

#[test]
fn test_optimize_budget_from_json() {
    let input: RehabOptimizeInput = serde_json::from_value(json!({
        "goal": "budget",
        "target": "$45,000",
        "sqft": 1000,
        "scope": "medium",
        "items": { "kitchen": "heavy", "bathroom": "heavy", "roof": "medium" }
    }))
    .unwrap();

    let out = optimize_rehab(&input);
    assert_eq!(out.result.original_total, dec!(77000));
    assert_eq!(out.result.optimized.estimate.total, dec!(45000));
    assert_eq!(out.result.savings, dec!(32000));
    assert_eq!(out.result.within_target, Some(true));
}

/// Once every item is exhausted the lowered tier is re-priced, so the
/// per-sqft baseline drops with it. Keeping the heavy baseline after the
/// tier step would leave this plan at 50000.
#[test]
fn test_budget_scope_fallback_reprices_baseline() {
    let items = RehabItems::new().with(RehabItem::Kitchen, Level::Light);
    let plan = optimize_to_budget(dec!(20000), &items, Level::Heavy, dec!(1000));

    assert_eq!(plan.scope, Level::Light);
    assert_eq!(plan.items.level(RehabItem::Kitchen), None);
    assert_eq!(plan.estimate.base_rehab, dec!(15000));
    assert_eq!(plan.estimate.total, dec!(15000));
    assert_ne!(
        plan.estimate.total,
        estimate_cost(dec!(1000), Level::Heavy, &RehabItems::new()).total
    );
}

#[test]
fn test_optimize_goal_variants_parse() {
    for goal in ["roi", "timeline", "arv"] {
        let input: RehabOptimizeInput =
            serde_json::from_value(json!({ "goal": goal, "sqft": 1000 })).unwrap();
        let out = optimize_rehab(&input);
        assert!(out.result.within_target.is_none());
    }
}

proptest! {
    #[test]
    fn prop_budget_met_or_fully_downgraded(
        items in items_strategy(),
        scope in level_strategy(),
        sqft in 0u32..5_000,
        target in 0u32..200_000,
    ) {
        let sqft = Decimal::from(sqft);
        let target = Decimal::from(target);
        let plan = optimize_to_budget(target, &items, scope, sqft);

        if target > Decimal::ZERO && plan.estimate.total <= target {
            return Ok(());
        }

        // No fit: lightest scope with every item removed.
        prop_assert_eq!(plan.scope, Level::Light);
        prop_assert_eq!(plan.items.scoped().count(), 0);
        prop_assert_eq!(plan.estimate.total, sqft * dec!(15));
    }

    #[test]
    fn prop_budget_reachable_when_light_baseline_fits(
        items in items_strategy(),
        scope in level_strategy(),
        sqft in 0u32..5_000,
        slack in 1u32..50_000,
    ) {
        let sqft = Decimal::from(sqft);
        let target = sqft * dec!(15) + Decimal::from(slack);
        let plan = optimize_to_budget(target, &items, scope, sqft);
        prop_assert!(plan.estimate.total <= target);
    }
}
