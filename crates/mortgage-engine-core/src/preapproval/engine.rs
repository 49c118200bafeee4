use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use super::guidelines::ProgramGuidelines;
use crate::records::{Borrower, CreditReport, Loan};
use crate::types::*;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreapprovalInput {
    #[serde(default)]
    pub borrower: Borrower,
    #[serde(default)]
    pub loan: Loan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<CreditReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<ProgramGuidelines>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanProgram {
    #[serde(rename = "FHA")]
    Fha,
    Conventional,
    #[serde(rename = "VA")]
    Va,
    #[serde(rename = "DSCR")]
    Dscr,
    #[serde(rename = "Non-QM")]
    NonQm,
}

impl fmt::Display for LoanProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fha => "FHA",
            Self::Conventional => "Conventional",
            Self::Va => "VA",
            Self::Dscr => "DSCR",
            Self::NonQm => "Non-QM",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreapprovalAssessment {
    pub front_end_dti: Option<Ratio>,
    pub back_end_dti: Option<Ratio>,
    pub ltv: Option<Ratio>,
    pub credit_score_used: u32,
    pub programs: Vec<LoanProgram>,
    pub red_flags: Vec<String>,
    pub conditions: Vec<String>,
}

pub const FLAG_LOW_SCORE: &str = "Low credit score";
pub const FLAG_HIGH_DTI: &str = "High back-end DTI";
pub const FLAG_HIGH_LTV: &str = "LTV exceeds program limits";
pub const FLAG_MISSING_INCOME: &str = "Missing income documentation";
pub const FLAG_MISSING_RENT: &str = "Missing rent / DSCR calculation";

pub const CONDITION_INCOME: &str =
    "Provide income documentation (W-2, paystubs, or bank statements).";
pub const CONDITION_EMPLOYMENT: &str = "Employment verification required.";
pub const CONDITION_APPRAISAL: &str = "Property valuation / appraisal needed.";
pub const CONDITION_CREDIT: &str = "Credit report required.";

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Rule-based preapproval over one borrower / loan / credit snapshot.
///
/// Every check is total: undefined ratios come back as `None` and fail the
/// rules that depend on them rather than erroring.
pub struct PreapprovalEngine<'a> {
    borrower: &'a Borrower,
    loan: &'a Loan,
    credit: Option<&'a CreditReport>,
    guidelines: ProgramGuidelines,
}

impl<'a> PreapprovalEngine<'a> {
    pub fn new(borrower: &'a Borrower, loan: &'a Loan, credit: Option<&'a CreditReport>) -> Self {
        Self::with_guidelines(borrower, loan, credit, ProgramGuidelines::default())
    }

    pub fn with_guidelines(
        borrower: &'a Borrower,
        loan: &'a Loan,
        credit: Option<&'a CreditReport>,
        guidelines: ProgramGuidelines,
    ) -> Self {
        Self {
            borrower,
            loan,
            credit,
            guidelines,
        }
    }

    /// Credit score, falling back to the guideline default when no report
    /// (or no score on the report) is available.
    pub fn credit_score(&self) -> u32 {
        self.credit
            .and_then(|c| c.credit_score)
            .unwrap_or(self.guidelines.default_credit_score)
    }

    fn monthly_debts(&self) -> Money {
        self.credit
            .map(|c| c.monthly_debt_total)
            .unwrap_or(self.guidelines.default_monthly_debts)
    }

    /// Front-end and back-end DTI, 3 dp. `(None, None)` without positive income.
    pub fn calc_dti(&self) -> (Option<Ratio>, Option<Ratio>) {
        let total_income = self.borrower.total_income();
        if total_income <= Decimal::ZERO {
            return (None, None);
        }

        let housing = self.borrower.monthly_housing_payment.unwrap_or_default();
        let front = housing.checked_div(total_income).map(|r| r.round_dp(3));
        let back = housing
            .saturating_add(self.monthly_debts())
            .checked_div(total_income)
            .map(|r| r.round_dp(3));
        (front, back)
    }

    /// Loan amount over property value, 4 dp.
    pub fn calc_ltv(&self) -> Option<Ratio> {
        let value = self.loan.known_property_value()?;
        let amount = self.loan.amount?;
        amount.checked_div(value).map(|r| r.round_dp(4))
    }

    /// Every program the file currently fits, in rule order.
    pub fn program_fit(&self) -> Vec<LoanProgram> {
        let g = &self.guidelines;
        let score = self.credit_score();
        let ltv = self.calc_ltv();
        let (_, back) = self.calc_dti();

        let ltv_within = |max: Ratio| ltv.is_some_and(|l| l <= max);
        let dti_within = |max: Ratio| back.is_some_and(|b| b <= max);

        let mut programs = Vec::new();

        if ltv_within(g.fha_max_ltv) && score >= g.fha_min_score && dti_within(g.fha_max_back_dti) {
            programs.push(LoanProgram::Fha);
        }

        if ltv_within(g.conventional_max_ltv)
            && score >= g.conventional_min_score
            && dti_within(g.conventional_max_back_dti)
        {
            programs.push(LoanProgram::Conventional);
        }

        if self.borrower.veteran_status && dti_within(g.va_max_back_dti) {
            programs.push(LoanProgram::Va);
        }

        if self.loan.is_dscr()
            && self.loan.monthly_rent > Decimal::ZERO
            && self.loan.estimated_payment > Decimal::ZERO
        {
            let coverage = self.loan.monthly_rent.checked_div(self.loan.estimated_payment);
            if coverage.is_some_and(|c| c >= g.dscr_min_ratio) {
                programs.push(LoanProgram::Dscr);
            }
        }

        if score >= g.non_qm_min_score {
            programs.push(LoanProgram::NonQm);
        }

        programs
    }

    /// All applicable underwriting red flags.
    pub fn red_flags(&self) -> Vec<String> {
        let g = &self.guidelines;
        let (_, back) = self.calc_dti();
        let ltv = self.calc_ltv();
        let mut flags = Vec::new();

        if self.credit_score() < g.flag_min_score {
            flags.push(FLAG_LOW_SCORE.to_string());
        }
        if back.is_some_and(|b| b > g.flag_max_back_dti) {
            flags.push(FLAG_HIGH_DTI.to_string());
        }
        if ltv.is_some_and(|l| l > g.flag_max_ltv) {
            flags.push(FLAG_HIGH_LTV.to_string());
        }
        if !self.borrower.has_income() {
            flags.push(FLAG_MISSING_INCOME.to_string());
        }
        if self.loan.is_dscr() && self.loan.monthly_rent <= Decimal::ZERO {
            flags.push(FLAG_MISSING_RENT.to_string());
        }

        flags
    }

    /// Documentation still needed before the file can be preapproved.
    pub fn required_conditions(&self) -> Vec<String> {
        let mut conditions = Vec::new();

        if !self.borrower.has_income() {
            conditions.push(CONDITION_INCOME.to_string());
        }
        if self.borrower.employer_name.is_none() {
            conditions.push(CONDITION_EMPLOYMENT.to_string());
        }
        if self.loan.known_property_value().is_none() {
            conditions.push(CONDITION_APPRAISAL.to_string());
        }
        if self.credit.is_none() {
            conditions.push(CONDITION_CREDIT.to_string());
        }

        conditions
    }

    pub fn assess(&self) -> PreapprovalAssessment {
        let (front_end_dti, back_end_dti) = self.calc_dti();
        PreapprovalAssessment {
            front_end_dti,
            back_end_dti,
            ltv: self.calc_ltv(),
            credit_score_used: self.credit_score(),
            programs: self.program_fit(),
            red_flags: self.red_flags(),
            conditions: self.required_conditions(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full preapproval assessment for one file.
pub fn assess_preapproval(input: &PreapprovalInput) -> ComputationOutput<PreapprovalAssessment> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let guidelines = input.guidelines.clone().unwrap_or_default();
    let engine = PreapprovalEngine::with_guidelines(
        &input.borrower,
        &input.loan,
        input.credit.as_ref(),
        guidelines.clone(),
    );

    if input.credit.as_ref().and_then(|c| c.credit_score).is_none() {
        warnings.push(format!(
            "No credit score on file; assumed {}.",
            guidelines.default_credit_score
        ));
    }
    if input.borrower.total_income() <= Decimal::ZERO {
        warnings.push("Total income is not positive; DTI is undefined.".into());
    }

    let assessment = engine.assess();
    tracing::debug!(
        programs = assessment.programs.len(),
        flags = assessment.red_flags.len(),
        "preapproval assessed"
    );

    with_metadata(
        "Rule-based DTI / LTV program fit",
        &guidelines,
        warnings,
        start.elapsed().as_micros() as u64,
        assessment,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn borrower() -> Borrower {
        Borrower {
            full_name: "Jordan Blake".into(),
            address: "12 Elm St".into(),
            income: Some(dec!(8000)),
            monthly_housing_payment: Some(dec!(2000)),
            employer_name: Some("Acme Logistics".into()),
            ..Default::default()
        }
    }

    fn loan() -> Loan {
        Loan {
            amount: Some(dec!(300_000)),
            property_value: Some(dec!(400_000)),
            loan_type: "conventional".into(),
            ..Default::default()
        }
    }

    fn credit(score: u32, debts: Money) -> CreditReport {
        CreditReport {
            credit_score: Some(score),
            monthly_debt_total: debts,
        }
    }

    #[test]
    fn test_dti_ratios() {
        let (b, l, c) = (borrower(), loan(), credit(700, dec!(1200)));
        let engine = PreapprovalEngine::new(&b, &l, Some(&c));
        // front 2000/8000 = 0.25, back 3200/8000 = 0.4
        assert_eq!(engine.calc_dti(), (Some(dec!(0.25)), Some(dec!(0.4))));
    }

    #[test]
    fn test_dti_undefined_without_income() {
        let mut b = borrower();
        b.income = None;
        let l = loan();
        let engine = PreapprovalEngine::new(&b, &l, None);
        assert_eq!(engine.calc_dti(), (None, None));
    }

    #[test]
    fn test_ltv_four_places() {
        let b = borrower();
        let mut l = loan();
        l.amount = Some(dec!(123_456));
        let engine = PreapprovalEngine::new(&b, &l, None);
        assert_eq!(engine.calc_ltv(), Some(dec!(0.3086)));
        l.property_value = Some(Decimal::ZERO);
        let engine = PreapprovalEngine::new(&b, &l, None);
        assert_eq!(engine.calc_ltv(), None);
    }

    #[test]
    fn test_strong_file_fits_fha_conventional_nonqm() {
        let (b, l, c) = (borrower(), loan(), credit(720, dec!(500)));
        let programs = PreapprovalEngine::new(&b, &l, Some(&c)).program_fit();
        assert_eq!(
            programs,
            vec![LoanProgram::Fha, LoanProgram::Conventional, LoanProgram::NonQm]
        );
    }

    #[test]
    fn test_missing_credit_uses_660() {
        let (b, l) = (borrower(), loan());
        let engine = PreapprovalEngine::new(&b, &l, None);
        assert_eq!(engine.credit_score(), 660);
        assert!(engine.program_fit().contains(&LoanProgram::Conventional));
        assert!(engine.required_conditions().contains(&CONDITION_CREDIT.to_string()));
    }

    #[test]
    fn test_veteran_qualifies_for_va() {
        let mut b = borrower();
        b.veteran_status = true;
        let (l, c) = (loan(), credit(600, dec!(2000)));
        // back = 4000/8000 = 0.5 → VA (≤0.55), FHA (≤0.50), not Conventional (score 600)
        let programs = PreapprovalEngine::new(&b, &l, Some(&c)).program_fit();
        assert_eq!(
            programs,
            vec![LoanProgram::Fha, LoanProgram::Va, LoanProgram::NonQm]
        );
    }

    #[test]
    fn test_dscr_program_and_flag() {
        let b = borrower();
        let mut l = loan();
        l.loan_type = "DSCR".into();
        l.monthly_rent = dec!(2600);
        l.estimated_payment = dec!(2400);
        let engine = PreapprovalEngine::new(&b, &l, None);
        assert!(engine.program_fit().contains(&LoanProgram::Dscr));

        l.monthly_rent = Decimal::ZERO;
        let engine = PreapprovalEngine::new(&b, &l, None);
        assert!(!engine.program_fit().contains(&LoanProgram::Dscr));
        assert!(engine.red_flags().contains(&FLAG_MISSING_RENT.to_string()));
    }

    #[test]
    fn test_every_flag_reported() {
        let mut b = borrower();
        b.income = None;
        let mut l = loan();
        l.amount = Some(dec!(395_000));
        l.loan_type = "dscr".into();
        let c = credit(540, dec!(900));
        let flags = PreapprovalEngine::new(&b, &l, Some(&c)).red_flags();
        assert_eq!(
            flags,
            vec![FLAG_LOW_SCORE, FLAG_HIGH_LTV, FLAG_MISSING_INCOME, FLAG_MISSING_RENT]
        );
    }

    #[test]
    fn test_conditions_for_empty_file() {
        let b = Borrower::default();
        let l = Loan::default();
        let conditions = PreapprovalEngine::new(&b, &l, None).required_conditions();
        assert_eq!(
            conditions,
            vec![CONDITION_INCOME, CONDITION_EMPLOYMENT, CONDITION_APPRAISAL, CONDITION_CREDIT]
        );
    }

    #[test]
    fn test_envelope_warns_on_missing_score() {
        let input = PreapprovalInput {
            borrower: borrower(),
            loan: loan(),
            credit: None,
            guidelines: None,
        };
        let out = assess_preapproval(&input);
        assert_eq!(out.result.credit_score_used, 660);
        assert!(out.warnings.iter().any(|w| w.contains("660")));
    }
}
