use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::estimate::{estimate_cost, RehabEstimate};
use super::scope::{Comps, Level, RehabItem, RehabItems};
use super::tables::{BUDGET_DOWNGRADE_ORDER, ROI_HEAVY_MARGIN};
use crate::numeric::lenient;
use crate::types::*;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "goal", rename_all = "lowercase")]
pub enum OptimizationGoal {
    Budget {
        #[serde(default, deserialize_with = "lenient::money")]
        target: Money,
    },
    Roi,
    Timeline,
    Arv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehabOptimizeInput {
    #[serde(flatten)]
    pub goal: OptimizationGoal,
    #[serde(default, deserialize_with = "lenient::money")]
    pub sqft: Decimal,
    #[serde(default)]
    pub scope: Level,
    #[serde(default)]
    pub items: RehabItems,
    #[serde(default)]
    pub comps: Comps,
}

/// Adjusted plan: the item map handed back to the caller, the scope it was
/// priced at, and the resulting estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRehab {
    pub items: RehabItems,
    pub scope: Level,
    pub estimate: RehabEstimate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehabOptimizeOutput {
    pub original_total: Money,
    pub optimized: OptimizedRehab,
    pub savings: Money,
    /// Only meaningful for the budget goal.
    pub within_target: Option<bool>,
}

// ---------------------------------------------------------------------------
// Optimisers
// ---------------------------------------------------------------------------

fn within(total: Money, target: Money) -> bool {
    target > Decimal::ZERO && total <= target
}

/// Greedily trim items until the plan fits `target_budget`.
///
/// Items are walked in [`BUDGET_DOWNGRADE_ORDER`], each stepped down its
/// ladder one rung at a time with the total re-priced after every step; the
/// first fit wins. This is a local search, not a cheapest-fit solver. When
/// every listed item is exhausted the overall scope drops a tier at a time
/// down to light; the light-scope estimate is returned whether or not it
/// fits. A non-positive target is never satisfied, so it always ends there.
pub fn optimize_to_budget(
    target_budget: Money,
    items: &RehabItems,
    scope: Level,
    sqft: Decimal,
) -> OptimizedRehab {
    let mut optimized = items.clone();
    let mut estimate = estimate_cost(sqft, scope, &optimized);

    if within(estimate.total, target_budget) {
        return OptimizedRehab {
            items: optimized,
            scope,
            estimate,
        };
    }

    for (item, ladder) in BUDGET_DOWNGRADE_ORDER {
        let Some(current) = optimized.slot(item) else {
            continue;
        };
        let Some(mut rung) = ladder.iter().position(|l| *l == current) else {
            continue;
        };

        while rung + 1 < ladder.len() {
            rung += 1;
            optimized.set(item, ladder[rung]);
            estimate = estimate_cost(sqft, scope, &optimized);
            tracing::debug!(%item, total = %estimate.total, "rehab item downgraded");
            if within(estimate.total, target_budget) {
                return OptimizedRehab {
                    items: optimized,
                    scope,
                    estimate,
                };
            }
        }
    }

    let mut scope = scope;
    while scope != Level::Light {
        let lower = scope.downgraded();
        tracing::debug!(from = %scope, to = %lower, "rehab scope downgraded");
        scope = lower;
        estimate = estimate_cost(sqft, scope, &optimized);
        if within(estimate.total, target_budget) {
            break;
        }
    }

    OptimizedRehab {
        items: optimized,
        scope,
        estimate,
    }
}

/// Balanced mid-grade finishes, going heavy on kitchen and bath when the
/// resale margin can carry it.
pub fn optimize_for_roi(items: &RehabItems, scope: Level, sqft: Decimal, comps: &Comps) -> OptimizedRehab {
    let mut optimized = items.clone();
    for item in [RehabItem::Kitchen, RehabItem::Bathroom, RehabItem::Flooring, RehabItem::Paint] {
        optimized.set(item, Some(Level::Medium));
    }

    if comps.margin() > ROI_HEAVY_MARGIN {
        optimized.set(RehabItem::Kitchen, Some(Level::Heavy));
        optimized.set(RehabItem::Bathroom, Some(Level::Heavy));
    }

    let estimate = estimate_cost(sqft, scope, &optimized);
    OptimizedRehab {
        items: optimized,
        scope,
        estimate,
    }
}

/// Shortest schedule: everything light, no roof or HVAC work.
pub fn optimize_for_timeline(items: &RehabItems, sqft: Decimal) -> OptimizedRehab {
    let scope = Level::Light;
    let mut optimized = items.clone();
    let listed: Vec<RehabItem> = optimized.items().collect();
    for item in listed {
        optimized.set(item, Some(Level::Light));
    }
    optimized.set(RehabItem::Roof, None);
    optimized.set(RehabItem::Hvac, None);

    let estimate = estimate_cost(sqft, scope, &optimized);
    OptimizedRehab {
        items: optimized,
        scope,
        estimate,
    }
}

/// Resale-first plan: heavy kitchen and bath, mid-grade floors and paint.
pub fn optimize_for_arv(items: &RehabItems, sqft: Decimal) -> OptimizedRehab {
    let scope = Level::Heavy;
    let mut optimized = items.clone();
    optimized.set(RehabItem::Kitchen, Some(Level::Heavy));
    optimized.set(RehabItem::Bathroom, Some(Level::Heavy));
    optimized.set(RehabItem::Flooring, Some(Level::Medium));
    optimized.set(RehabItem::Paint, Some(Level::Medium));

    let estimate = estimate_cost(sqft, scope, &optimized);
    OptimizedRehab {
        items: optimized,
        scope,
        estimate,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run one optimiser and report what it changed.
pub fn optimize_rehab(input: &RehabOptimizeInput) -> ComputationOutput<RehabOptimizeOutput> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let original_total = estimate_cost(input.sqft, input.scope, &input.items).total;

    let (optimized, within_target) = match &input.goal {
        OptimizationGoal::Budget { target } => {
            let plan = optimize_to_budget(*target, &input.items, input.scope, input.sqft);
            let fits = within(plan.estimate.total, *target);
            if !fits {
                warnings.push(format!(
                    "Budget {target} not reachable; returning fully downgraded plan at {}.",
                    plan.estimate.total
                ));
            }
            (plan, Some(fits))
        }
        OptimizationGoal::Roi => {
            if input.comps.arv_estimate.is_zero() {
                warnings.push("No ARV estimate; ROI plan assumes no resale margin.".into());
            }
            (
                optimize_for_roi(&input.items, input.scope, input.sqft, &input.comps),
                None,
            )
        }
        OptimizationGoal::Timeline => (optimize_for_timeline(&input.items, input.sqft), None),
        OptimizationGoal::Arv => (optimize_for_arv(&input.items, input.sqft), None),
    };

    let savings = original_total.saturating_sub(optimized.estimate.total);

    with_metadata(
        "Rule-based rehab scope optimisation",
        &input.goal,
        warnings,
        start.elapsed().as_micros() as u64,
        RehabOptimizeOutput {
            original_total,
            optimized,
            savings,
            within_target,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn heavy_plan() -> RehabItems {
        RehabItems::new()
            .with(RehabItem::Kitchen, Level::Heavy)
            .with(RehabItem::Bathroom, Level::Heavy)
            .with(RehabItem::Roof, Level::Medium)
    }

    #[test]
    fn test_already_within_budget_is_untouched() {
        let plan = optimize_to_budget(dec!(200_000), &heavy_plan(), Level::Medium, dec!(1000));
        assert_eq!(plan.items, heavy_plan());
        assert_eq!(plan.estimate.total, dec!(77000));
    }

    #[test]
    fn test_kitchen_trimmed_first() {
        // 30000 + 25000 + 15000 + 7000 = 77000; kitchen heavy→medium saves 10000
        let plan = optimize_to_budget(dec!(67_000), &heavy_plan(), Level::Medium, dec!(1000));
        assert_eq!(plan.items.level(RehabItem::Kitchen), Some(Level::Medium));
        assert_eq!(plan.items.level(RehabItem::Bathroom), Some(Level::Heavy));
        assert_eq!(plan.estimate.total, dec!(67000));
    }

    #[test]
    fn test_kitchen_ladder_exhausted_before_bathroom() {
        // kitchen removed (52000) still above 50000, bathroom heavy→medium gives 45000
        let plan = optimize_to_budget(dec!(50_000), &heavy_plan(), Level::Medium, dec!(1000));
        assert!(plan.items.contains(RehabItem::Kitchen));
        assert_eq!(plan.items.level(RehabItem::Kitchen), None);
        assert_eq!(plan.items.level(RehabItem::Bathroom), Some(Level::Medium));
        assert_eq!(plan.estimate.total, dec!(45000));
        assert_eq!(plan.scope, Level::Medium);
    }

    #[test]
    fn test_unreachable_budget_ends_fully_downgraded() {
        let plan = optimize_to_budget(dec!(1_000), &heavy_plan(), Level::Heavy, dec!(1000));
        assert!(plan.items.scoped().next().is_none());
        assert_eq!(plan.scope, Level::Light);
        assert_eq!(plan.estimate.total, dec!(15000));
    }

    #[test]
    fn test_scope_drop_stops_once_within_budget() {
        // items exhausted at 50000 heavy; medium scope gives 30000
        let plan = optimize_to_budget(dec!(35_000), &heavy_plan(), Level::Heavy, dec!(1000));
        assert_eq!(plan.scope, Level::Medium);
        assert_eq!(plan.estimate.total, dec!(30000));
    }

    #[test]
    fn test_zero_target_never_satisfied() {
        let plan = optimize_to_budget(Decimal::ZERO, &RehabItems::new(), Level::Medium, dec!(100));
        assert_eq!(plan.scope, Level::Light);
        assert_eq!(plan.estimate.total, dec!(1500));
    }

    #[test]
    fn test_roi_goes_heavy_on_big_margin() {
        let comps = Comps::new(dec!(400_000), dec!(250_000));
        let plan = optimize_for_roi(&RehabItems::new(), Level::Medium, dec!(1000), &comps);
        assert_eq!(plan.items.level(RehabItem::Kitchen), Some(Level::Heavy));
        assert_eq!(plan.items.level(RehabItem::Flooring), Some(Level::Medium));

        let thin = Comps::new(dec!(300_000), dec!(250_000));
        let plan = optimize_for_roi(&RehabItems::new(), Level::Medium, dec!(1000), &thin);
        assert_eq!(plan.items.level(RehabItem::Kitchen), Some(Level::Medium));
    }

    #[test]
    fn test_timeline_forces_light_and_drops_systems() {
        let plan = optimize_for_timeline(&heavy_plan(), dec!(1000));
        assert_eq!(plan.scope, Level::Light);
        assert_eq!(plan.items.level(RehabItem::Kitchen), Some(Level::Light));
        assert_eq!(plan.items.level(RehabItem::Roof), None);
        assert_eq!(plan.items.level(RehabItem::Hvac), None);
        // 15000 + 8000 + 4000
        assert_eq!(plan.estimate.total, dec!(27000));
    }

    #[test]
    fn test_arv_plan() {
        let plan = optimize_for_arv(&RehabItems::new(), dec!(1000));
        assert_eq!(plan.scope, Level::Heavy);
        // 50000 + 25000 + 15000 + 6000 + 4000
        assert_eq!(plan.estimate.total, dec!(100000));
    }

    #[test]
    fn test_envelope_reports_savings() {
        let input = RehabOptimizeInput {
            goal: OptimizationGoal::Budget { target: dec!(67_000) },
            sqft: dec!(1000),
            scope: Level::Medium,
            items: heavy_plan(),
            comps: Comps::default(),
        };
        let out = optimize_rehab(&input);
        assert_eq!(out.result.original_total, dec!(77000));
        assert_eq!(out.result.savings, dec!(10000));
        assert_eq!(out.result.within_target, Some(true));
        assert!(out.warnings.is_empty());
    }
}
