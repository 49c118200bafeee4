use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::records::LoanFile;
use crate::types::*;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Pipeline stage labels, in checklist order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PipelineStage {
    #[serde(rename = "Application Started")]
    ApplicationStarted,
    #[serde(rename = "1003 Completed")]
    ApplicationCompleted,
    #[serde(rename = "Awaiting Documents")]
    AwaitingDocuments,
    #[serde(rename = "Documents Submitted")]
    DocumentsSubmitted,
    #[serde(rename = "eSign Required")]
    EsignRequired,
    #[serde(rename = "Disclosures Signed")]
    DisclosuresSigned,
    #[serde(rename = "Conditions Pending")]
    ConditionsPending,
    #[serde(rename = "Conditions Cleared")]
    ConditionsCleared,
    #[serde(rename = "Appraisal In Progress")]
    AppraisalInProgress,
    #[serde(rename = "Appraisal Completed")]
    AppraisalCompleted,
    #[serde(rename = "Clear to Close")]
    ClearToClose,
}

impl PipelineStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ApplicationStarted => "Application Started",
            Self::ApplicationCompleted => "1003 Completed",
            Self::AwaitingDocuments => "Awaiting Documents",
            Self::DocumentsSubmitted => "Documents Submitted",
            Self::EsignRequired => "eSign Required",
            Self::DisclosuresSigned => "Disclosures Signed",
            Self::ConditionsPending => "Conditions Pending",
            Self::ConditionsCleared => "Conditions Cleared",
            Self::AppraisalInProgress => "Appraisal In Progress",
            Self::AppraisalCompleted => "Appraisal Completed",
            Self::ClearToClose => "Clear to Close",
        }
    }

    /// What the file is waiting on, for stages that stop the checklist.
    pub fn blocker(&self) -> Option<&'static str> {
        match self {
            Self::ApplicationStarted => Some("borrower name, address and income are required"),
            Self::AwaitingDocuments => Some("at least 4 loan documents are required"),
            Self::EsignRequired => Some("all e-sign documents must be signed"),
            Self::ConditionsPending => Some("open underwriting conditions remain"),
            Self::AppraisalInProgress => Some("no appraised property value yet"),
            Self::AppraisalCompleted => Some("awaiting final underwriting approval"),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub percent: u8,
    pub stage: PipelineStage,
}

impl ProgressReport {
    fn at(percent: u8, stage: PipelineStage) -> Self {
        Self { percent, stage }
    }
}

pub const MIN_DOCUMENTS: usize = 4;
const APPROVED_STATUSES: [&str; 2] = ["approved", "clear_to_close"];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Walk the loan checklist and stop at the first unmet gate.
///
/// Gates score 20 / 20 / 20 / 10 / 20; a file that clears every gate sits at
/// 90 until the loan status reaches approval, which jumps it to 100. An
/// empty underwriting condition list counts as cleared.
pub fn calculate_progress(file: &LoanFile) -> ProgressReport {
    let borrower = &file.borrower;
    let mut score = 0u8;

    let has_income = borrower.income.is_some_and(|i| i > Decimal::ZERO);
    if borrower.full_name.trim().is_empty() || borrower.address.trim().is_empty() || !has_income {
        tracing::debug!("progress gate failed: borrower profile incomplete");
        return ProgressReport::at(10, PipelineStage::ApplicationStarted);
    }
    score += 20;

    if file.documents.len() < MIN_DOCUMENTS {
        tracing::debug!(documents = file.documents.len(), "progress gate failed: documents");
        return ProgressReport::at(score, PipelineStage::AwaitingDocuments);
    }
    score += 20;

    let esign = &borrower.esign_documents;
    if esign.is_empty() || !esign.iter().all(|d| d.is_signed()) {
        tracing::debug!(esign = esign.len(), "progress gate failed: e-sign");
        return ProgressReport::at(score, PipelineStage::EsignRequired);
    }
    score += 20;

    let open = file
        .underwriting_conditions
        .iter()
        .filter(|c| !c.is_cleared())
        .count();
    if open > 0 {
        tracing::debug!(open, "progress gate failed: conditions");
        return ProgressReport::at(score, PipelineStage::ConditionsPending);
    }
    score += 10;

    if !file.appraised_value.is_some_and(|v| v > Decimal::ZERO) {
        tracing::debug!("progress gate failed: appraisal");
        return ProgressReport::at(score, PipelineStage::AppraisalInProgress);
    }
    score += 20;

    let status = file.loan.status.trim().to_ascii_lowercase();
    if APPROVED_STATUSES.contains(&status.as_str()) {
        return ProgressReport::at(100, PipelineStage::ClearToClose);
    }

    ProgressReport::at(score, PipelineStage::AppraisalCompleted)
}

/// [`calculate_progress`] wrapped in the standard envelope, with a warning
/// naming whatever the file is waiting on.
pub fn progress_report(file: &LoanFile) -> ComputationOutput<ProgressReport> {
    let start = Instant::now();
    let report = calculate_progress(file);

    let warnings = report
        .stage
        .blocker()
        .map(|b| vec![format!("{}: {b}", report.stage)])
        .unwrap_or_default();

    with_metadata(
        "Sequential loan checklist (profile, documents, e-sign, conditions, appraisal, approval)",
        &serde_json::json!({
            "min_documents": MIN_DOCUMENTS,
            "approved_statuses": APPROVED_STATUSES,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        report,
    )
}
