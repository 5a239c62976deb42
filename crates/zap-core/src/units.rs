//! Base-unit and fixed-point conversions
//!
//! Pure functions that take the decimal exponent explicitly. Token amounts
//! go through `rust_decimal` so scaling is exact; curve values go through
//! `to_fixed_point`, the single routine shared with the on-chain encoder.
//!
//! # Units
//!
//! - ZAP amounts: base units (u128), 1 ZAP = 10^18 base units
//! - Fixed-point curve values: signed integers (i128), value * 10^decimals

use rust_decimal::prelude::*;

use crate::constants::MAX_FIXED_POINT_DECIMALS;
use crate::UnitsError;

/// Largest scale a `Decimal` can carry
const MAX_DECIMAL_SCALE: u32 = 28;

/// Convert a token amount into integer base units, truncating any digits
/// beyond `decimals`.
///
/// `to_base_units(1.5, 18) == 1_500_000_000_000_000_000`
pub fn to_base_units(amount: Decimal, decimals: u32) -> Result<u128, UnitsError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(UnitsError::Negative {
            amount: amount.to_string(),
        });
    }

    let overflow = || UnitsError::Overflow {
        value: amount.to_string(),
        decimals,
    };

    let mantissa = amount.mantissa().unsigned_abs();
    let scale = amount.scale();

    if decimals >= scale {
        let factor = 10u128.checked_pow(decimals - scale).ok_or_else(overflow)?;
        mantissa.checked_mul(factor).ok_or_else(overflow)
    } else {
        let divisor = 10u128.checked_pow(scale - decimals).ok_or_else(overflow)?;
        Ok(mantissa / divisor)
    }
}

/// Convert integer base units back into a token amount.
pub fn from_base_units(raw: u128, decimals: u32) -> Result<Decimal, UnitsError> {
    if decimals > MAX_DECIMAL_SCALE {
        return Err(UnitsError::UnsupportedDecimals { decimals });
    }

    let overflow = || UnitsError::Overflow {
        value: raw.to_string(),
        decimals,
    };

    let mantissa = i128::try_from(raw).map_err(|_| overflow())?;
    Decimal::try_from_i128_with_scale(mantissa, decimals)
        .map(|d| d.normalize())
        .map_err(|_| overflow())
}

/// Convert a raw curve value into a signed fixed-point integer.
///
/// The value is scaled by `10^decimals` and rounded half away from zero.
pub fn to_fixed_point(value: f64, decimals: u32) -> Result<i128, UnitsError> {
    if !value.is_finite() {
        return Err(UnitsError::NotFinite { value });
    }
    if decimals > MAX_FIXED_POINT_DECIMALS {
        return Err(UnitsError::UnsupportedDecimals { decimals });
    }

    let overflow = || UnitsError::Overflow {
        value: value.to_string(),
        decimals,
    };

    let exact = Decimal::from_f64(value).ok_or_else(overflow)?;
    let rounded = exact.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);

    // round_dp leaves the scale at or below `decimals`
    let factor = 10i128
        .checked_pow(decimals.saturating_sub(rounded.scale()))
        .ok_or_else(overflow)?;
    rounded.mantissa().checked_mul(factor).ok_or_else(overflow)
}

/// Inverse of [`to_fixed_point`], exact up to f64 precision.
pub fn from_fixed_point(raw: i128, decimals: u32) -> f64 {
    raw as f64 / 10f64.powi(decimals as i32)
}
