//! Error types for zapkit

use thiserror::Error;

/// Core errors that can occur in zapkit
#[derive(Debug, Error)]
pub enum Error {
    #[error("Units error: {0}")]
    Units(#[from] UnitsError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Base-unit and fixed-point conversion errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitsError {
    #[error("Value is not finite: {value}")]
    NotFinite { value: f64 },

    #[error("Negative amount not allowed: {amount}")]
    Negative { amount: String },

    #[error("Value {value} overflows at {decimals} decimals")]
    Overflow { value: String, decimals: u32 },

    #[error("Unsupported decimal exponent: {decimals}")]
    UnsupportedDecimals { decimals: u32 },
}

/// Errors reported by the ledger-submission collaborator
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger unreachable at {url}")]
    Unreachable { url: String },

    #[error("Ledger rejected call: {message}")]
    Rejected { message: String },

    #[error("Transaction submission failed: {message}")]
    SubmissionFailed { message: String },
}

/// Result type alias for zapkit operations
pub type Result<T> = std::result::Result<T, Error>;

impl UnitsError {
    /// Get a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFinite { .. } => "not_finite",
            Self::Negative { .. } => "negative_amount",
            Self::Overflow { .. } => "overflow",
            Self::UnsupportedDecimals { .. } => "unsupported_decimals",
        }
    }
}

impl LedgerError {
    /// Get a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "ledger_unreachable",
            Self::Rejected { .. } => "ledger_rejected",
            Self::SubmissionFailed { .. } => "submission_failed",
        }
    }
}
