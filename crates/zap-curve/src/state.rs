//! Curve State Types
//!
//! Data structures for curve definitions, structured segments, cost previews
//! and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zap_core::{LedgerError, UnitsError};

use crate::constants::{function_codes, term_layout};

/// Transform applied to the input before a term is exponentiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Identity,
    Abs,
    Log2,
}

impl FunctionKind {
    /// Decode a wire code. Codes other than ABS/LOG2 decode to `Identity`.
    pub fn from_code(code: f64) -> Self {
        if code == function_codes::ABS {
            Self::Abs
        } else if code == function_codes::LOG2 {
            Self::Log2
        } else {
            Self::Identity
        }
    }

    /// Decode a wire code, accepting only the three canonical codes
    pub fn from_code_strict(code: f64) -> Option<Self> {
        if code == function_codes::IDENTITY {
            Some(Self::Identity)
        } else if code == function_codes::ABS || code == function_codes::LOG2 {
            Some(Self::from_code(code))
        } else {
            None
        }
    }

    /// Canonical wire code
    pub fn code(self) -> f64 {
        match self {
            Self::Identity => function_codes::IDENTITY,
            Self::Abs => function_codes::ABS,
            Self::Log2 => function_codes::LOG2,
        }
    }

    /// Apply the transform to `x`.
    ///
    /// `Log2` clamps negative inputs to 0 and yields `-inf` at exactly 0.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Abs => {
                if x < 0.0 {
                    -x
                } else {
                    x
                }
            }
            Self::Log2 => {
                if x < 0.0 {
                    0.0
                } else {
                    x.log2()
                }
            }
        }
    }
}

/// One summand of a segment's price polynomial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub coefficient: f64,
    pub power: f64,
    pub function: FunctionKind,
}

impl Term {
    pub fn new(coefficient: f64, power: f64, function: FunctionKind) -> Self {
        Self {
            coefficient,
            power,
            function,
        }
    }

    /// Build a term from one (coefficient, power, function) group
    pub(crate) fn from_group(group: &[f64]) -> Self {
        Self {
            coefficient: group[term_layout::COEFFICIENT],
            power: group[term_layout::POWER],
            function: FunctionKind::from_code(group[term_layout::FUNCTION]),
        }
    }

    /// coefficient * f(x)^power, with a zero power always contributing
    /// `coefficient` (even when f(x) is 0 or negative).
    pub fn evaluate(&self, x: f64) -> f64 {
        let x = self.function.apply(x);
        let base = if self.power > 0.0 {
            x.powf(self.power)
        } else {
            1.0
        };
        base * self.coefficient
    }
}

/// One piece of the curve, valid over the inclusive range `[start, end]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub terms: Vec<Term>,
}

impl Segment {
    pub fn contains(&self, x: f64) -> bool {
        self.start <= x && x <= self.end
    }

    /// Sum of all term contributions, in term order
    pub fn evaluate(&self, x: f64) -> f64 {
        self.terms.iter().fold(0.0, |sum, term| sum + term.evaluate(x))
    }
}

/// Flattened curve description exchanged with the registry contract
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveDefinition {
    /// (coefficient, power, function) per term, all segments in order
    pub constants: Vec<f64>,
    /// (start, end) per segment
    pub parts: Vec<f64>,
    /// Cumulative term count through each segment
    pub dividers: Vec<usize>,
}

impl CurveDefinition {
    pub fn new(constants: Vec<f64>, parts: Vec<f64>, dividers: Vec<usize>) -> Self {
        Self {
            constants,
            parts,
            dividers,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CurveError> {
        serde_json::from_str(json).map_err(|e| CurveError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CurveError> {
        serde_json::to_string(self).map_err(|e| CurveError::Serialization(e.to_string()))
    }
}

/// Preview for bonding units against a curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondPreview {
    /// Units already bound before this request
    pub issued: u64,
    /// Units requested
    pub units: u64,
    /// Sum of the marginal prices of every requested unit
    pub total_cost: f64,
    /// total_cost / units (0 when no units are requested)
    pub average_price: f64,
    /// Price of the first unit bound
    pub first_unit_price: f64,
    /// Price of the last unit bound
    pub last_unit_price: f64,
    /// Whether every requested unit lies inside the curve's domain
    pub within_domain: bool,
}

/// Preview for unbonding units from a curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnbondPreview {
    /// Units bound before this request
    pub issued: u64,
    /// Units returned
    pub units: u64,
    /// Sum of the marginal prices of every returned unit
    pub total_refund: f64,
    /// total_refund / units (0 when no units are returned)
    pub average_price: f64,
}

/// Curve engine errors
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("Invalid curve definition: {reason}")]
    InvalidCurveDefinition { reason: String },

    #[error("Fixed-point conversion failed: {0}")]
    FixedPoint(#[from] UnitsError),

    #[error("Invalid hex word: {word}")]
    InvalidHex { word: String },

    #[error("Fixed-point word out of range: {word}")]
    WordOutOfRange { word: String },

    #[error("Cannot unbond {requested} units, only {issued} issued")]
    UnbondExceedsIssued { issued: u64, requested: u64 },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CurveError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidCurveDefinition {
            reason: reason.into(),
        }
    }

    /// Get a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCurveDefinition { .. } => "invalid_curve_definition",
            Self::FixedPoint(_) => "fixed_point",
            Self::InvalidHex { .. } => "invalid_hex",
            Self::WordOutOfRange { .. } => "word_out_of_range",
            Self::UnbondExceedsIssued { .. } => "unbond_exceeds_issued",
            Self::Ledger(_) => "ledger",
            Self::Serialization(_) => "serialization",
        }
    }
}
