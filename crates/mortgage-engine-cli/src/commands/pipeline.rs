use clap::Args;
use serde_json::Value;

use mortgage_engine_core::pipeline::{progress_report, score_engagement, EngagementInput};
use mortgage_engine_core::records::LoanFile;

use crate::input;

#[derive(Args)]
pub struct ProgressArgs {
    /// Path to a JSON loan file (borrower, loan, documents, conditions, appraisal)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_progress(args: ProgressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let file: LoanFile = input::required(args.input.as_deref(), "pipeline progress")?;
    Ok(serde_json::to_value(progress_report(&file))?)
}

#[derive(Args)]
pub struct EngagementArgs {
    /// Path to JSON input with `events` and an optional `now`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_engagement(args: EngagementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engagement_input: EngagementInput = input::required(args.input.as_deref(), "engagement scoring")?;
    Ok(serde_json::to_value(score_engagement(&engagement_input))?)
}
