use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::scope::{Comps, Level, RehabItem, RehabItems, Strategy};
use super::tables::*;
use crate::numeric::lenient;
use crate::types::*;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RehabInput {
    #[serde(default, deserialize_with = "lenient::money")]
    pub sqft: Decimal,
    #[serde(default)]
    pub scope: Level,
    #[serde(default)]
    pub items: RehabItems,
    #[serde(default)]
    pub comps: Comps,
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCost {
    pub level: Level,
    pub cost: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RehabEstimate {
    pub base_rehab: Money,
    pub items: BTreeMap<RehabItem, ItemCost>,
    pub total: Money,
    /// Effective all-in cost per square foot; 0 without a square footage.
    pub cost_per_sqft: Money,
    pub scope: Level,
}

impl RehabEstimate {
    pub fn heavy_item_count(&self) -> usize {
        self.items.values().filter(|c| c.level == Level::Heavy).count()
    }

    fn has_kitchen_or_bath(&self) -> bool {
        self.items.contains_key(&RehabItem::Kitchen) || self.items.contains_key(&RehabItem::Bathroom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RehabTimeline {
    pub total_weeks: Decimal,
    pub breakdown: BTreeMap<RehabItem, Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCosts {
    pub total_material_cost: Money,
    pub breakdown: BTreeMap<RehabItem, Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehabAnalysis {
    pub estimate: RehabEstimate,
    pub timeline: RehabTimeline,
    pub materials: MaterialCosts,
    pub risk_flags: Vec<String>,
    pub notes: Vec<String>,
}

pub const RISK_OVER_ARV: &str = "Rehab cost exceeds 40% of ARV.";
pub const RISK_OVER_PRICE: &str = "Rehab cost exceeds 50% of purchase price.";
pub const RISK_COST_PER_SQFT: &str = "Cost per sqft is unusually high.";
pub const RISK_MULTIPLE_HEAVY: &str = "Multiple heavy items — major renovation.";
pub const RISK_NO_KITCHEN_BATH: &str =
    "Medium/heavy rehab usually includes kitchen or bathroom updates.";

// ---------------------------------------------------------------------------
// Estimators
// ---------------------------------------------------------------------------

/// Baseline per-sqft cost for the scope plus itemised add-ons.
pub fn estimate_cost(sqft: Decimal, scope: Level, items: &RehabItems) -> RehabEstimate {
    let sqft = sqft.max(Decimal::ZERO);
    let base_rehab = sqft.checked_mul(SQFT_RATES.get(scope)).unwrap_or(Decimal::ZERO);

    let mut breakdown = BTreeMap::new();
    let mut total = base_rehab;
    for (item, level) in items.scoped() {
        if let Some(table) = item_cost(item) {
            let cost = table.get(level);
            breakdown.insert(item, ItemCost { level, cost });
            total = total.saturating_add(cost);
        }
    }

    let cost_per_sqft = total
        .checked_div(sqft)
        .map(|c| c.round_dp(2))
        .unwrap_or(Decimal::ZERO);

    RehabEstimate {
        base_rehab,
        items: breakdown,
        total,
        cost_per_sqft,
        scope,
    }
}

/// Deal-level warnings about the size and shape of the rehab.
pub fn risk_flags(estimate: &RehabEstimate, comps: &Comps) -> Vec<String> {
    let mut flags = Vec::new();
    let arv = comps.arv_estimate;
    let price = comps.purchase_price();

    if arv > Decimal::ZERO && estimate.total > arv * RISK_MAX_SHARE_OF_ARV {
        flags.push(RISK_OVER_ARV.to_string());
    }
    if price > Decimal::ZERO && estimate.total > price * RISK_MAX_SHARE_OF_PRICE {
        flags.push(RISK_OVER_PRICE.to_string());
    }
    if estimate.cost_per_sqft > RISK_MAX_COST_PER_SQFT {
        flags.push(RISK_COST_PER_SQFT.to_string());
    }
    if estimate.heavy_item_count() >= RISK_HEAVY_ITEM_COUNT {
        flags.push(RISK_MULTIPLE_HEAVY.to_string());
    }
    if estimate.scope != Level::Light && !estimate.has_kitchen_or_bath() {
        flags.push(RISK_NO_KITCHEN_BATH.to_string());
    }

    flags
}

/// Duration in weeks: scope baseline plus item contributions.
pub fn timeline_estimate(items: &RehabItems, scope: Level) -> RehabTimeline {
    let mut total_weeks = BASE_WEEKS.get(scope);
    let mut breakdown = BTreeMap::new();

    for (item, level) in items.scoped() {
        if let Some(table) = item_weeks(item) {
            let weeks = table.get(level);
            breakdown.insert(item, weeks);
            total_weeks = total_weeks.saturating_add(weeks);
        }
    }

    RehabTimeline {
        total_weeks,
        breakdown,
    }
}

/// Material budget: per-sqft finishes plus per-room fixtures.
pub fn material_costs(sqft: Decimal, items: &RehabItems) -> MaterialCosts {
    let sqft = sqft.max(Decimal::ZERO);
    let mut breakdown: BTreeMap<RehabItem, Money> = BTreeMap::new();
    let mut total = Decimal::ZERO;

    for (item, level) in items.scoped() {
        if let Some(rate) = material_rate(item) {
            let cost = sqft.checked_mul(rate.get(level)).unwrap_or(Decimal::ZERO);
            let line = breakdown.entry(item).or_default();
            *line = line.saturating_add(cost);
            total = total.saturating_add(cost);
        }
        if let Some(fixed) = fixed_material(item) {
            let cost = fixed.get(level);
            let line = breakdown.entry(item).or_default();
            *line = line.saturating_add(cost);
            total = total.saturating_add(cost);
        }
    }

    MaterialCosts {
        total_material_cost: total,
        breakdown,
    }
}

/// Advisory bullet points for the deal workspace.
pub fn notes(
    estimate: &RehabEstimate,
    timeline: Option<&RehabTimeline>,
    strategy: Strategy,
) -> Vec<String> {
    let mut notes = vec![match estimate.scope {
        Level::Light => "Light rehab — quick cosmetic improvements.",
        Level::Medium => "Medium rehab — balanced upgrades.",
        Level::Heavy => "Heavy rehab — long timeline, major work.",
    }
    .to_string()];

    for (item, cost) in &estimate.items {
        let level = cost.level.as_str();
        let mut level_label = level[..1].to_ascii_uppercase();
        level_label.push_str(&level[1..]);
        notes.push(format!("{} renovation: {}.", item.label(), level_label));
    }

    if estimate.scope != Level::Light && !estimate.has_kitchen_or_bath() {
        notes.push("Consider updating kitchen or bathroom.".into());
    }

    match strategy {
        Strategy::Flip => {
            notes.push("For flips, prioritize kitchens, bathrooms, flooring.".into());
            if estimate.cost_per_sqft > NOTE_FLIP_COST_PER_SQFT {
                notes.push("High cost per sqft — ensure ARV supports it.".into());
            }
        }
        Strategy::Rental => notes.push("For rentals, use durable, low-maintenance materials.".into()),
        Strategy::Airbnb => notes.push("For Airbnb, focus on guest experience upgrades.".into()),
        Strategy::Other => {}
    }

    if timeline.is_some_and(|t| t.total_weeks > NOTE_LONG_TIMELINE_WEEKS) {
        notes.push("Long rehab timeline — consider holding costs.".into());
    }

    notes
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Cost, schedule, materials, risk flags and notes for one rehab plan.
pub fn analyze_rehab(input: &RehabInput) -> ComputationOutput<RehabAnalysis> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.sqft <= Decimal::ZERO {
        warnings.push("No square footage; baseline and per-sqft figures are zero.".into());
    }
    if input.comps.arv_estimate.is_zero() {
        warnings.push("No ARV estimate; ARV risk check skipped.".into());
    }

    let estimate = estimate_cost(input.sqft, input.scope, &input.items);
    let timeline = timeline_estimate(&input.items, input.scope);
    let materials = material_costs(input.sqft, &input.items);
    let flags = risk_flags(&estimate, &input.comps);
    let notes = notes(&estimate, Some(&timeline), input.strategy);

    let assumptions = serde_json::json!({
        "sqft_rates": {
            "light": SQFT_RATES.light,
            "medium": SQFT_RATES.medium,
            "heavy": SQFT_RATES.heavy,
        },
        "strategy": input.strategy,
    });

    with_metadata(
        "Per-sqft baseline plus itemised rehab schedule",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        RehabAnalysis {
            estimate,
            timeline,
            materials,
            risk_flags: flags,
            notes,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_baseline_only() {
        let e = estimate_cost(dec!(1000), Level::Medium, &RehabItems::new());
        assert_eq!(e.total, dec!(30000));
        assert_eq!(e.cost_per_sqft, dec!(30));
        assert!(e.items.is_empty());
    }

    #[test]
    fn test_items_add_to_baseline() {
        let items = RehabItems::new()
            .with(RehabItem::Kitchen, Level::Heavy)
            .with(RehabItem::Paint, Level::Light)
            .with(RehabItem::Tile, Level::Heavy);
        let e = estimate_cost(dec!(1200), Level::Light, &items);
        // 1200*15 + 25000 + 2000
        assert_eq!(e.base_rehab, dec!(18000));
        assert_eq!(e.total, dec!(45000));
        assert_eq!(e.cost_per_sqft, dec!(37.5));
        assert!(!e.items.contains_key(&RehabItem::Tile));
    }

    #[test]
    fn test_zero_and_negative_sqft() {
        let items = RehabItems::new().with(RehabItem::Roof, Level::Medium);
        let e = estimate_cost(dec!(-500), Level::Heavy, &items);
        assert_eq!(e.base_rehab, Decimal::ZERO);
        assert_eq!(e.total, dec!(7000));
        assert_eq!(e.cost_per_sqft, Decimal::ZERO);
    }

    #[test]
    fn test_per_sqft_cost_zero_when_undefined() {
        let items = RehabItems::new().with(RehabItem::Kitchen, Level::Heavy);
        let e = estimate_cost(dec!(0.0000000000000000000000000001), Level::Medium, &items);
        assert_eq!(e.total, dec!(25000));
        assert_eq!(e.cost_per_sqft, Decimal::ZERO);

        let m = material_costs(Decimal::MAX, &items);
        assert!(m.total_material_cost >= Decimal::ZERO);
    }

    #[test]
    fn test_risk_flags_all_trip() {
        let items = RehabItems::new()
            .with(RehabItem::Roof, Level::Heavy)
            .with(RehabItem::Hvac, Level::Heavy);
        let e = estimate_cost(dec!(400), Level::Heavy, &items);
        // 20000 + 12000 + 9000 = 41000, 102.5/sqft
        let comps = Comps::new(dec!(100_000), dec!(80_000));
        assert_eq!(
            risk_flags(&e, &comps),
            vec![
                RISK_OVER_ARV,
                RISK_OVER_PRICE,
                RISK_COST_PER_SQFT,
                RISK_MULTIPLE_HEAVY,
                RISK_NO_KITCHEN_BATH,
            ]
        );
    }

    #[test]
    fn test_light_scope_without_kitchen_not_flagged() {
        let e = estimate_cost(dec!(1000), Level::Light, &RehabItems::new());
        assert!(risk_flags(&e, &Comps::default()).is_empty());
    }

    #[test]
    fn test_timeline() {
        let items = RehabItems::new()
            .with(RehabItem::Kitchen, Level::Heavy)
            .with(RehabItem::Bathroom, Level::Medium);
        let t = timeline_estimate(&items, Level::Heavy);
        assert_eq!(t.total_weeks, dec!(14));
        assert_eq!(t.breakdown[&RehabItem::Kitchen], dec!(4));
    }

    #[test]
    fn test_materials() {
        let items = RehabItems::new()
            .with(RehabItem::Flooring, Level::Medium)
            .with(RehabItem::Kitchen, Level::Light)
            .with(RehabItem::Roof, Level::Heavy);
        let m = material_costs(dec!(1000), &items);
        // flooring 2500 + kitchen 1500; roof has no material line
        assert_eq!(m.total_material_cost, dec!(4000));
        assert_eq!(m.breakdown.len(), 2);
    }

    #[test]
    fn test_notes_for_heavy_flip() {
        let items = RehabItems::new().with(RehabItem::Hvac, Level::Heavy);
        let e = estimate_cost(dec!(500), Level::Heavy, &items);
        let t = timeline_estimate(&items, Level::Heavy);
        let n = notes(&e, Some(&t), Strategy::Flip);
        assert_eq!(
            n,
            vec![
                "Heavy rehab — long timeline, major work.",
                "Hvac renovation: Heavy.",
                "Consider updating kitchen or bathroom.",
                "For flips, prioritize kitchens, bathrooms, flooring.",
                "High cost per sqft — ensure ARV supports it.",
                "Long rehab timeline — consider holding costs.",
            ]
        );
    }

    #[test]
    fn test_analyze_envelope() {
        let input = RehabInput {
            sqft: dec!(1500),
            scope: Level::Medium,
            items: RehabItems::new().with(RehabItem::Kitchen, Level::Medium),
            comps: Comps::new(dec!(350_000), dec!(220_000)),
            strategy: Strategy::Rental,
        };
        let out = analyze_rehab(&input);
        assert_eq!(out.result.estimate.total, dec!(60000));
        assert!(out.result.risk_flags.is_empty());
        assert!(out.result.notes.iter().any(|n| n.contains("rentals")));
    }
}
