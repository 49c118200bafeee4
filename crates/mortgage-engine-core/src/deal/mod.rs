//! Deal workspace: side-by-side flip, long-term rental and short-term rental
//! budgets for one property, and the exit they recommend.

pub mod budgets;
pub mod inputs;
pub mod recommend;

pub use budgets::{
    calculate_airbnb_budget, calculate_flip_budget, calculate_rental_budget, AirbnbBudget,
    FlipBudget, RentalBudget,
};
pub use inputs::{DealComps, DealForm, DealInput, RehabSummary, RentalComp, ResaleComp};
pub use recommend::{
    analyze_deal, recommend_strategy, DealAnalysis, StrategyRecommendation, StrategyScores,
};
