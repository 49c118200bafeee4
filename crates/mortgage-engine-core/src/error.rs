use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageEngineError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MortgageEngineError {
    fn from(e: serde_json::Error) -> Self {
        MortgageEngineError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for MortgageEngineError {
    fn from(e: std::io::Error) -> Self {
        MortgageEngineError::Storage(e.to_string())
    }
}
