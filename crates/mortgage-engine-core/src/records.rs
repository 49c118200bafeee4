//! Plain snapshots of the portal's borrower / loan / credit rows.
//!
//! The web tier reads these out of storage and hands them to the engines by
//! reference. Every field deserialises leniently (see [`crate::numeric`]).

use serde::{Deserialize, Serialize};

use crate::numeric::lenient;
use crate::types::Money;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Borrower {
    #[serde(default, deserialize_with = "lenient::text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: String,
    /// Monthly gross income from the primary source.
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub income: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub monthly_income_secondary: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub monthly_housing_payment: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub employer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub years_at_job: Option<Money>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub veteran_status: bool,
    #[serde(default)]
    pub esign_documents: Vec<EsignDocument>,
}

impl Borrower {
    /// Primary plus secondary monthly income.
    pub fn total_income(&self) -> Money {
        self.income
            .unwrap_or_default()
            .saturating_add(self.monthly_income_secondary.unwrap_or_default())
    }

    pub fn has_income(&self) -> bool {
        self.income.is_some_and(|i| !i.is_zero())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsignDocument {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
}

impl EsignDocument {
    pub fn is_signed(&self) -> bool {
        self.status == "Signed"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub amount: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub property_value: Option<Money>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub loan_type: String,
    #[serde(default, deserialize_with = "lenient::money")]
    pub monthly_rent: Money,
    #[serde(default, deserialize_with = "lenient::money")]
    pub estimated_payment: Money,
    #[serde(default, deserialize_with = "lenient::count")]
    pub term_months: u32,
    /// Note rate in percent.
    #[serde(default, deserialize_with = "lenient::money")]
    pub rate: Money,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub property_address: String,
}

impl Loan {
    pub fn is_dscr(&self) -> bool {
        self.loan_type.trim().eq_ignore_ascii_case("dscr")
    }

    /// Property value when one has been recorded and is non-zero.
    pub fn known_property_value(&self) -> Option<Money> {
        self.property_value.filter(|v| !v.is_zero())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditReport {
    #[serde(default, deserialize_with = "lenient::opt_score")]
    pub credit_score: Option<u32>,
    #[serde(default, deserialize_with = "lenient::money")]
    pub monthly_debt_total: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanDocument {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub document_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingCondition {
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
}

impl UnderwritingCondition {
    pub fn is_cleared(&self) -> bool {
        self.status == "Cleared"
    }
}

/// Everything the pipeline progress engine looks at for one loan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanFile {
    #[serde(default)]
    pub borrower: Borrower,
    #[serde(default)]
    pub loan: Loan,
    #[serde(default)]
    pub credit: Option<CreditReport>,
    #[serde(default)]
    pub documents: Vec<LoanDocument>,
    #[serde(default)]
    pub underwriting_conditions: Vec<UnderwritingCondition>,
    /// Appraised value of the subject property, once the appraisal is in.
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub appraised_value: Option<Money>,
}
