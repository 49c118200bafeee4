//! Rehab cost, duration and downgrade tables.
//!
//! Kept as data so the estimator, optimisers and tests all read the same
//! declared values and orderings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::scope::{Level, RehabItem};
use crate::types::{Money, Ratio};

/// One value per renovation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTable {
    pub light: Decimal,
    pub medium: Decimal,
    pub heavy: Decimal,
}

impl LevelTable {
    pub const fn new(light: Decimal, medium: Decimal, heavy: Decimal) -> Self {
        Self {
            light,
            medium,
            heavy,
        }
    }

    pub fn get(&self, level: Level) -> Decimal {
        match level {
            Level::Light => self.light,
            Level::Medium => self.medium,
            Level::Heavy => self.heavy,
        }
    }
}

fn lookup(table: &[(RehabItem, LevelTable)], item: RehabItem) -> Option<&LevelTable> {
    table.iter().find(|(i, _)| *i == item).map(|(_, t)| t)
}

/// Whole-house baseline, dollars per square foot.
pub const SQFT_RATES: LevelTable = LevelTable::new(dec!(15), dec!(30), dec!(50));

/// Fixed add-on cost per item.
pub static ITEM_COSTS: [(RehabItem, LevelTable); 6] = [
    (RehabItem::Kitchen, LevelTable::new(dec!(8000), dec!(15000), dec!(25000))),
    (RehabItem::Bathroom, LevelTable::new(dec!(4000), dec!(8000), dec!(15000))),
    (RehabItem::Flooring, LevelTable::new(dec!(3000), dec!(6000), dec!(12000))),
    (RehabItem::Paint, LevelTable::new(dec!(2000), dec!(4000), dec!(8000))),
    (RehabItem::Roof, LevelTable::new(dec!(3000), dec!(7000), dec!(12000))),
    (RehabItem::Hvac, LevelTable::new(dec!(2000), dec!(5000), dec!(9000))),
];

/// Baseline duration in weeks by overall scope.
pub const BASE_WEEKS: LevelTable = LevelTable::new(dec!(2), dec!(4), dec!(8));

/// Additional weeks per item.
pub static ITEM_WEEKS: [(RehabItem, LevelTable); 6] = [
    (RehabItem::Kitchen, LevelTable::new(dec!(1), dec!(2), dec!(4))),
    (RehabItem::Bathroom, LevelTable::new(dec!(1), dec!(2), dec!(3))),
    (RehabItem::Flooring, LevelTable::new(dec!(1), dec!(1), dec!(2))),
    (RehabItem::Paint, LevelTable::new(dec!(1), dec!(1), dec!(2))),
    (RehabItem::Roof, LevelTable::new(dec!(1), dec!(2), dec!(3))),
    (RehabItem::Hvac, LevelTable::new(dec!(1), dec!(2), dec!(3))),
];

/// Materials priced per square foot.
pub static MATERIAL_RATES: [(RehabItem, LevelTable); 3] = [
    (RehabItem::Flooring, LevelTable::new(dec!(1.50), dec!(2.50), dec!(5.00))),
    (RehabItem::Paint, LevelTable::new(dec!(0.50), dec!(1.00), dec!(1.50))),
    (RehabItem::Tile, LevelTable::new(dec!(2.00), dec!(4.00), dec!(7.00))),
];

/// Materials priced per room.
pub static FIXED_MATERIALS: [(RehabItem, LevelTable); 2] = [
    (RehabItem::Kitchen, LevelTable::new(dec!(1500), dec!(3500), dec!(8000))),
    (RehabItem::Bathroom, LevelTable::new(dec!(800), dec!(2000), dec!(4500))),
];

/// Rungs an item walks down when the budget optimiser trims it; the last
/// rung removes the item.
pub const DOWNGRADE_LADDER: [Option<Level>; 4] =
    [Some(Level::Heavy), Some(Level::Medium), Some(Level::Light), None];

/// Order in which the budget optimiser trims items.
pub const BUDGET_DOWNGRADE_ORDER: [(RehabItem, [Option<Level>; 4]); 6] = [
    (RehabItem::Kitchen, DOWNGRADE_LADDER),
    (RehabItem::Bathroom, DOWNGRADE_LADDER),
    (RehabItem::Flooring, DOWNGRADE_LADDER),
    (RehabItem::Paint, DOWNGRADE_LADDER),
    (RehabItem::Roof, DOWNGRADE_LADDER),
    (RehabItem::Hvac, DOWNGRADE_LADDER),
];

/// ARV − purchase price above which the ROI optimiser goes heavy on kitchen and bath.
pub const ROI_HEAVY_MARGIN: Money = dec!(80000);

pub const RISK_MAX_SHARE_OF_ARV: Ratio = dec!(0.4);
pub const RISK_MAX_SHARE_OF_PRICE: Ratio = dec!(0.5);
pub const RISK_MAX_COST_PER_SQFT: Money = dec!(60);
pub const RISK_HEAVY_ITEM_COUNT: usize = 2;

pub const NOTE_FLIP_COST_PER_SQFT: Money = dec!(50);
pub const NOTE_LONG_TIMELINE_WEEKS: Decimal = dec!(10);

pub fn item_cost(item: RehabItem) -> Option<&'static LevelTable> {
    lookup(&ITEM_COSTS, item)
}

pub fn item_weeks(item: RehabItem) -> Option<&'static LevelTable> {
    lookup(&ITEM_WEEKS, item)
}

pub fn material_rate(item: RehabItem) -> Option<&'static LevelTable> {
    lookup(&MATERIAL_RATES, item)
}

pub fn fixed_material(item: RehabItem) -> Option<&'static LevelTable> {
    lookup(&FIXED_MATERIALS, item)
}
