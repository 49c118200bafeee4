use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Ratio};

/// Program eligibility and red-flag thresholds.
///
/// `Default` reproduces the house guidelines; any subset can be overridden
/// from a JSON or YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramGuidelines {
    /// Score assumed when no credit report has been pulled.
    pub default_credit_score: u32,
    /// Monthly debts assumed when no credit report has been pulled.
    pub default_monthly_debts: Money,

    pub fha_max_ltv: Ratio,
    pub fha_min_score: u32,
    pub fha_max_back_dti: Ratio,

    pub conventional_max_ltv: Ratio,
    pub conventional_min_score: u32,
    pub conventional_max_back_dti: Ratio,

    pub va_max_back_dti: Ratio,

    pub dscr_min_ratio: Ratio,

    pub non_qm_min_score: u32,

    pub flag_min_score: u32,
    pub flag_max_back_dti: Ratio,
    pub flag_max_ltv: Ratio,
}

impl Default for ProgramGuidelines {
    fn default() -> Self {
        Self {
            default_credit_score: 660,
            default_monthly_debts: Money::ZERO,
            fha_max_ltv: dec!(0.965),
            fha_min_score: 580,
            fha_max_back_dti: dec!(0.50),
            conventional_max_ltv: dec!(0.97),
            conventional_min_score: 620,
            conventional_max_back_dti: dec!(0.45),
            va_max_back_dti: dec!(0.55),
            dscr_min_ratio: dec!(1.0),
            non_qm_min_score: 500,
            flag_min_score: 580,
            flag_max_back_dti: dec!(0.55),
            flag_max_ltv: dec!(0.97),
        }
    }
}
