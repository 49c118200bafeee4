//! Plain-text body of the preapproval letter.
//!
//! Layout only; the portal turns these lines into a PDF.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::engine::{PreapprovalAssessment, PreapprovalEngine, PreapprovalInput};
use crate::payments::scenario::LoanScenario;
use crate::records::{Borrower, Loan};
use crate::types::{pct_display, with_metadata, ComputationOutput};

pub const LENDER_NAME: &str = "Caughman Mason Loan Services";
pub const DISCLAIMER: &str =
    "This pre-approval is subject to underwriting verification and property approval.";

fn money_or_na(value: Option<rust_decimal::Decimal>) -> String {
    value.map(|v| format!("${}", v.round_dp(2))).unwrap_or_else(|| "N/A".into())
}

/// Render the letter as ordered lines.
pub fn render_summary(
    borrower: &Borrower,
    loan: &Loan,
    assessment: &PreapprovalAssessment,
    payment: &LoanScenario,
    underwriting_summary: Option<&str>,
    generated_on: NaiveDate,
) -> Vec<String> {
    let mut lines = vec![
        LENDER_NAME.to_string(),
        "PRE-APPROVAL LETTER".to_string(),
        String::new(),
        format!("Borrower: {}", borrower.full_name),
        format!("Email: {}", borrower.email),
        format!("Phone: {}", borrower.phone),
        String::new(),
        format!("Loan Amount: {}", money_or_na(loan.amount)),
        format!("Loan Type: {}", loan.loan_type),
        format!("Property Value: {}", money_or_na(loan.property_value)),
        format!("Address: {}", loan.property_address),
        String::new(),
        format!("Principal & Interest: ${}", payment.p_and_i),
        format!("Taxes: ${}", payment.taxes),
        format!("Insurance: ${}", payment.insurance),
        format!("PMI: ${}", payment.pmi),
        format!("Total Payment: ${}", payment.total_payment),
        String::new(),
        format!("LTV: {}", pct_display(assessment.ltv)),
        format!("Front-End DTI: {}", pct_display(assessment.front_end_dti)),
        format!("Back-End DTI: {}", pct_display(assessment.back_end_dti)),
    ];

    if !assessment.programs.is_empty() {
        let programs: Vec<String> = assessment.programs.iter().map(|p| p.to_string()).collect();
        lines.push(format!("Eligible Programs: {}", programs.join(", ")));
    }

    if let Some(summary) = underwriting_summary.filter(|s| !s.trim().is_empty()) {
        lines.push(String::new());
        lines.push("Underwriting Summary:".to_string());
        lines.extend(summary.lines().map(str::to_string));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated on {} by {}.",
        generated_on.format("%B %d, %Y"),
        LENDER_NAME
    ));
    lines.push(DISCLAIMER.to_string());
    lines
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LetterInput {
    #[serde(flatten)]
    pub file: PreapprovalInput,
    #[serde(default)]
    pub underwriting_summary: Option<String>,
    /// Letter date; the caller's "today" when omitted.
    #[serde(default)]
    pub generated_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreapprovalLetter {
    pub assessment: PreapprovalAssessment,
    pub payment: LoanScenario,
    pub lines: Vec<String>,
}

/// Assess the file, price the requested loan and lay out the letter.
pub fn build_letter(input: &LetterInput, today: NaiveDate) -> ComputationOutput<PreapprovalLetter> {
    let start = Instant::now();
    let file = &input.file;
    let mut warnings = Vec::new();

    let engine = PreapprovalEngine::with_guidelines(
        &file.borrower,
        &file.loan,
        file.credit.as_ref(),
        file.guidelines.clone().unwrap_or_default(),
    );
    let assessment = engine.assess();
    if !assessment.red_flags.is_empty() {
        warnings.push(format!(
            "Letter issued with open red flags: {}.",
            assessment.red_flags.join("; ")
        ));
    }

    let payment = LoanScenario::new(
        "Preapproval",
        file.loan.amount.unwrap_or_default(),
        file.loan.rate,
        file.loan.term_months,
        file.loan.property_value.unwrap_or_default(),
    );

    let lines = render_summary(
        &file.borrower,
        &file.loan,
        &assessment,
        &payment,
        input.underwriting_summary.as_deref(),
        input.generated_on.unwrap_or(today),
    );

    with_metadata(
        "Preapproval assessment with PITI estimate, rendered as letter lines",
        &serde_json::json!({ "lender": LENDER_NAME }),
        warnings,
        start.elapsed().as_micros() as u64,
        PreapprovalLetter {
            assessment,
            payment,
            lines,
        },
    )
}
