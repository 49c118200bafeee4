//! Fix-and-flip rehab estimation: itemised cost, schedule, materials,
//! risk flags, and rule-based scope optimisers.

pub mod estimate;
pub mod optimize;
pub mod scope;
pub mod tables;

pub use estimate::{
    analyze_rehab, estimate_cost, material_costs, risk_flags, timeline_estimate, RehabAnalysis,
    RehabEstimate, RehabInput,
};
pub use optimize::{
    optimize_for_arv, optimize_for_roi, optimize_for_timeline, optimize_rehab, optimize_to_budget,
    OptimizationGoal, OptimizedRehab, RehabOptimizeInput,
};
pub use scope::{Comps, Level, RehabItem, RehabItems, Strategy};
