pub mod error;
pub mod numeric;
pub mod records;
pub mod types;

#[cfg(feature = "payments")]
pub mod payments;

#[cfg(feature = "preapproval")]
pub mod preapproval;

#[cfg(feature = "rehab")]
pub mod rehab;

#[cfg(feature = "deal")]
pub mod deal;

#[cfg(feature = "pipeline")]
pub mod pipeline;

#[cfg(feature = "property")]
pub mod property;

#[cfg(feature = "persistence")]
pub mod persistence;

pub use error::MortgageEngineError;
pub use types::*;

/// Standard result type for the fallible edges of the engine (I/O, parsing).
pub type MortgageEngineResult<T> = Result<T, MortgageEngineError>;
