//! Fixed-point curve encoding
//!
//! The registry contract takes a curve as three `int256[]` arrays. Each value
//! is converted with [`zap_core::units::to_fixed_point`] and written as one
//! 32-byte big-endian two's-complement word:
//!
//! ```text
//! 0x<64 hex chars>
//! ```
//!
//! `constants` and `parts` are scaled by `10^decimals`. `dividers` are term
//! indices and are always written unscaled.

use serde::{Deserialize, Serialize};

use zap_core::units::{from_fixed_point, to_fixed_point};

use crate::constants::WORD_BYTES;
use crate::curve::Curve;
use crate::state::{CurveDefinition, CurveError};

/// Curve arrays encoded as fixed-point hex words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPointTriples {
    pub constants: Vec<String>,
    pub parts: Vec<String>,
    pub dividers: Vec<String>,
    /// Decimal exponent applied to `constants` and `parts`
    pub decimals: u32,
}

impl FixedPointTriples {
    /// Encode a curve definition
    pub fn encode(definition: &CurveDefinition, decimals: u32) -> Result<Self, CurveError> {
        Ok(Self {
            constants: encode_values(&definition.constants, decimals)?,
            parts: encode_values(&definition.parts, decimals)?,
            dividers: definition
                .dividers
                .iter()
                .map(|&d| encode_word(d as i128))
                .collect(),
            decimals,
        })
    }

    /// Decode back into a curve definition. Values are exact up to the
    /// rounding applied at `decimals`.
    pub fn decode(&self) -> Result<CurveDefinition, CurveError> {
        let dividers = self
            .dividers
            .iter()
            .map(|w| {
                let raw = decode_word(w)?;
                usize::try_from(raw).map_err(|_| CurveError::WordOutOfRange { word: w.clone() })
            })
            .collect::<Result<Vec<usize>, CurveError>>()?;

        Ok(CurveDefinition {
            constants: decode_values(&self.constants, self.decimals)?,
            parts: decode_values(&self.parts, self.decimals)?,
            dividers,
        })
    }
}

fn encode_values(values: &[f64], decimals: u32) -> Result<Vec<String>, CurveError> {
    values
        .iter()
        .map(|&v| {
            to_fixed_point(v, decimals)
                .map(encode_word)
                .map_err(CurveError::from)
        })
        .collect()
}

fn decode_values(words: &[String], decimals: u32) -> Result<Vec<f64>, CurveError> {
    words
        .iter()
        .map(|w| decode_word(w).map(|raw| from_fixed_point(raw, decimals)))
        .collect()
}

impl Curve {
    /// Fixed-point words for submitting this curve on-chain
    pub fn to_fixed_point_triples(&self, decimals: u32) -> Result<FixedPointTriples, CurveError> {
        FixedPointTriples::encode(self.definition(), decimals)
    }
}

/// Encode an i128 as a sign-extended 256-bit word
pub fn encode_word(value: i128) -> String {
    let mut word = if value < 0 {
        [0xffu8; WORD_BYTES]
    } else {
        [0u8; WORD_BYTES]
    };
    word[WORD_BYTES - 16..].copy_from_slice(&value.to_be_bytes());
    format!("0x{}", hex::encode(word))
}

/// Decode a 256-bit word. The `0x` prefix is optional; the value must fit
/// in an i128.
pub fn decode_word(word: &str) -> Result<i128, CurveError> {
    let digits = word.strip_prefix("0x").unwrap_or(word);
    let bytes = hex::decode(digits).map_err(|_| CurveError::InvalidHex {
        word: word.to_string(),
    })?;

    if bytes.len() != WORD_BYTES {
        return Err(CurveError::InvalidHex {
            word: word.to_string(),
        });
    }

    let (high, low) = bytes.split_at(WORD_BYTES - 16);
    let mut buf = [0u8; 16];
    buf.copy_from_slice(low);
    let value = i128::from_be_bytes(buf);

    // High half must be pure sign extension of the low half
    let sign = if value < 0 { 0xff } else { 0x00 };
    if high.iter().any(|&b| b != sign) {
        return Err(CurveError::WordOutOfRange {
            word: word.to_string(),
        });
    }

    Ok(value)
}
