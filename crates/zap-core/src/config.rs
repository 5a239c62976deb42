//! Configuration types for zapkit

use serde::{Deserialize, Serialize};

use crate::constants::MAX_FIXED_POINT_DECIMALS;
use crate::{Error, Result};

/// How the curve engine treats malformed curve arrays.
///
/// Whether the silent degradation of `Legacy` is a deliberate compatibility
/// contract with the on-chain evaluator or an unhandled edge case is not
/// settled, so both behaviors are kept selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Reject malformed curve arrays with an error
    Strict,
    /// Build whatever segments the arrays describe, never fail
    #[default]
    Legacy,
}

impl ValidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Legacy => "legacy",
        }
    }
}

/// Curve engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveConfig {
    /// Validation applied when building a curve
    #[serde(default)]
    pub validation: ValidationMode,

    /// Decimal exponent used when converting curve values to fixed-point words.
    /// 0 submits values as plain integers.
    #[serde(default)]
    pub fixed_point_decimals: u32,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            validation: ValidationMode::Legacy,
            fixed_point_decimals: 0,
        }
    }
}

impl CurveConfig {
    /// Config with strict validation and integer fixed-point words
    pub fn strict() -> Self {
        Self {
            validation: ValidationMode::Strict,
            ..Self::default()
        }
    }

    pub fn is_strict(&self) -> bool {
        self.validation == ValidationMode::Strict
    }

    /// Parse and validate a JSON config document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CurveConfig =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fixed_point_decimals > MAX_FIXED_POINT_DECIMALS {
            return Err(Error::Config(format!(
                "fixedPointDecimals must be at most {}, got {}",
                MAX_FIXED_POINT_DECIMALS, self.fixed_point_decimals
            )));
        }
        Ok(())
    }
}
