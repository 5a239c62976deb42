//! Core type definitions for zapkit

use serde::{Deserialize, Serialize};
use std::fmt;

/// Oracle endpoint name a curve is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(pub String);

impl Endpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction hash (32 bytes, 0x-prefixed hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Constants
pub mod constants {
    /// Decimal exponent of the ZAP token (1 ZAP = 10^18 base units)
    pub const ZAP_DECIMALS: u32 = 18;

    /// Largest decimal exponent the fixed-point routines accept.
    /// 10^38 is the largest power of ten that fits in an i128.
    pub const MAX_FIXED_POINT_DECIMALS: u32 = 38;
}
