use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repository::LoanRepository;
use crate::numeric::{lenient, to_text};
use crate::records::{Borrower, CreditReport, Loan};
use crate::MortgageEngineResult;

pub const NEED_STATUS_REQUIRED: &str = "required";

/// A document the processor still needs from the borrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNeed {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reason: String,
    /// required / uploaded / waived
    #[serde(default = "default_status", deserialize_with = "lenient::text")]
    pub status: String,
}

fn default_status() -> String {
    NEED_STATUS_REQUIRED.to_string()
}

impl DocumentNeed {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            status: default_status(),
        }
    }
}

/// Produces the raw checklist reply for a processor packet. Implemented by
/// the host over whatever text-generation backend it uses.
pub trait NeedsGenerator {
    fn generate(&self, packet: &str) -> MortgageEngineResult<String>;
}

fn show<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "None".into())
}

/// Processor prompt describing the file and the reply format expected back.
pub fn needs_packet(borrower: &Borrower, loan: &Loan, credit: Option<&CreditReport>) -> String {
    let credit_score = credit
        .and_then(|c| c.credit_score)
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".into());
    let credit_json = credit
        .and_then(|c| serde_json::to_string(c).ok())
        .unwrap_or_else(|| "{}".into());

    format!(
        "Borrower: {name}
Income: {income}
Secondary Income: {secondary}
Employer: {employer}
Job Title: {title}
Years at Job: {years}

Loan Type: {loan_type}
Loan Amount: {amount}
Property Value: {value}

Credit Score: {credit_score}
Credit Report JSON: {credit_json}

Provide a JSON array of required documents in this format:

[
  {{\"name\": \"...\", \"reason\": \"...\"}},
  {{\"name\": \"...\", \"reason\": \"...\"}}
]

Rules:
- Return ONLY valid JSON.
- Tailor needs to borrower type (W2, 1099, DSCR, FHA, etc.).
- Include risk-flag docs if needed (large deposits, new inquiries, etc.).
",
        name = borrower.full_name,
        income = show(borrower.income),
        secondary = show(borrower.monthly_income_secondary),
        employer = show(borrower.employer_name.as_deref()),
        title = borrower.job_title.as_deref().unwrap_or(""),
        years = borrower.years_at_job.map(|y| y.to_string()).unwrap_or_default(),
        loan_type = loan.loan_type,
        amount = show(loan.amount),
        value = show(loan.property_value),
    )
}

/// Parse a generator reply. Anything that isn't a JSON array yields no
/// needs; entries without a name are dropped.
pub fn parse_needs(reply: &str) -> Vec<DocumentNeed> {
    let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(reply.trim()) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|e| {
            let name = to_text(e.get("name")?);
            if name.trim().is_empty() {
                return None;
            }
            let reason = e.get("reason").map(to_text).unwrap_or_default();
            Some(DocumentNeed::new(name, reason))
        })
        .collect()
}

/// Ask the generator for the loan's outstanding documents and record them.
pub fn generate_needs(
    generator: &dyn NeedsGenerator,
    repo: &dyn LoanRepository,
    loan_id: &str,
) -> MortgageEngineResult<Vec<DocumentNeed>> {
    let file = repo.load_file(loan_id)?;
    let packet = needs_packet(&file.borrower, &file.loan, file.credit.as_ref());

    let reply = generator.generate(&packet)?;
    let needs = parse_needs(&reply);
    if needs.is_empty() {
        tracing::warn!(loan_id, "needs generator returned no usable entries");
    }

    repo.save_needs(loan_id, &needs)?;
    Ok(needs)
}
