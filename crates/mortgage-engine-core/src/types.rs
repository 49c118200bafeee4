use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual rates quoted as percentages (6.5 = 6.5%), the way loan officers enter them.
pub type RatePct = Decimal;

/// Ratios expressed as decimals (0.43 = 43%): DTI, LTV, DSCR.
pub type Ratio = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round a currency amount to cents.
pub fn round_money(value: Money) -> Money {
    value.round_dp(2)
}

/// Render a decimal ratio as a percentage string ("43.25%"), or "N/A" when undefined.
pub fn pct_display(ratio: Option<Ratio>) -> String {
    match ratio {
        Some(r) => match r.checked_mul(Decimal::ONE_HUNDRED) {
            Some(pct) => format!("{}%", pct.round_dp(2).normalize()),
            None => "N/A".to_string(),
        },
        None => "N/A".to_string(),
    }
}
