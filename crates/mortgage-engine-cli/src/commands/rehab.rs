use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::rehab::{
    analyze_rehab, optimize_rehab, OptimizationGoal, RehabInput, RehabOptimizeInput,
};

use crate::input;

#[derive(Args)]
pub struct RehabArgs {
    /// Path to JSON input file with sqft, scope, items, comps and strategy
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rehab(args: RehabArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rehab_input: RehabInput = input::required(args.input.as_deref(), "rehab analysis")?;
    Ok(serde_json::to_value(analyze_rehab(&rehab_input))?)
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GoalArg {
    Budget,
    Roi,
    Timeline,
    Arv,
}

#[derive(Args)]
pub struct OptimizeRehabArgs {
    #[arg(long)]
    pub input: Option<String>,

    /// Override the goal in the input file
    #[arg(long)]
    pub goal: Option<GoalArg>,

    /// Budget target, for the budget goal
    #[arg(long)]
    pub target: Option<Decimal>,
}

pub fn run_optimize(args: OptimizeRehabArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut opt_input: RehabOptimizeInput =
        input::required(args.input.as_deref(), "rehab optimisation")?;

    let current_target = match opt_input.goal {
        OptimizationGoal::Budget { target } => Some(target),
        _ => None,
    };
    let goal = match (args.goal, args.target) {
        (Some(GoalArg::Budget), target) | (None, target @ Some(_)) => {
            let target = target
                .or(current_target)
                .ok_or("--target is required for the budget goal")?;
            Some(OptimizationGoal::Budget { target })
        }
        (Some(GoalArg::Roi), _) => Some(OptimizationGoal::Roi),
        (Some(GoalArg::Timeline), _) => Some(OptimizationGoal::Timeline),
        (Some(GoalArg::Arv), _) => Some(OptimizationGoal::Arv),
        (None, None) => None,
    };
    if let Some(goal) = goal {
        opt_input.goal = goal;
    }

    Ok(serde_json::to_value(optimize_rehab(&opt_input))?)
}
