use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::Value;

use mortgage_engine_core::preapproval::{
    assess_preapproval, build_letter, LetterInput, PreapprovalInput, ProgramGuidelines,
};

use crate::input;

/// Guidelines from `--guidelines`, used only when the input carries none.
fn guideline_override(path: Option<&str>) -> Result<Option<ProgramGuidelines>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(None);
    };
    tracing::debug!(path, "loading program guidelines");
    Ok(Some(input::file::read_config::<ProgramGuidelines>(path)?))
}

#[derive(Args)]
pub struct PreapprovalArgs {
    /// Path to JSON input file with borrower, loan and optional credit
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_preapproval(
    args: PreapprovalArgs,
    guidelines: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut file: PreapprovalInput = input::required(args.input.as_deref(), "preapproval")?;
    if file.guidelines.is_none() {
        file.guidelines = guideline_override(guidelines)?;
    }
    Ok(serde_json::to_value(assess_preapproval(&file))?)
}

#[derive(Args)]
pub struct LetterArgs {
    #[arg(long)]
    pub input: Option<String>,

    /// Letter date (YYYY-MM-DD); today when omitted
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub fn run_letter(args: LetterArgs, guidelines: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let mut letter: LetterInput = input::required(args.input.as_deref(), "a preapproval letter")?;
    if letter.file.guidelines.is_none() {
        letter.file.guidelines = guideline_override(guidelines)?;
    }
    if args.date.is_some() {
        letter.generated_on = args.date;
    }
    let today = Local::now().date_naive();
    Ok(serde_json::to_value(build_letter(&letter, today))?)
}
