//! Bond/Unbond Calculator
//!
//! Pure math over a [`Curve`]. No async, no ledger.
//!
//! Bonding `n` units when `issued` are already bound costs the marginal
//! price of each new unit:
//!   cost = price(issued + 1) + ... + price(issued + n)
//!
//! Unbonding returns the same prices for the top `n` units:
//!   refund = price(issued - n + 1) + ... + price(issued)

use crate::curve::Curve;
use crate::state::{BondPreview, CurveError, UnbondPreview};

/// Cost of bonding `units` more units on top of `issued`.
///
/// Units past the curve's domain price at 0, as the curve does.
pub fn cost_of_units(curve: &Curve, issued: u64, units: u64) -> f64 {
    (1..=units).fold(0.0, |sum, k| {
        sum + curve.price(issued.saturating_add(k) as f64)
    })
}

/// Refund for unbonding the top `units` of `issued`.
pub fn refund_of_units(curve: &Curve, issued: u64, units: u64) -> Result<f64, CurveError> {
    if units > issued {
        return Err(CurveError::UnbondExceedsIssued {
            issued,
            requested: units,
        });
    }
    if units == 0 {
        return Ok(0.0);
    }
    let first = issued - units + 1;
    Ok((first..=issued).fold(0.0, |sum, x| sum + curve.price(x as f64)))
}

/// Preview bonding `units` units on top of `issued`
pub fn preview_bond(curve: &Curve, issued: u64, units: u64) -> BondPreview {
    if units == 0 {
        return BondPreview {
            issued,
            units,
            total_cost: 0.0,
            average_price: 0.0,
            first_unit_price: 0.0,
            last_unit_price: 0.0,
            within_domain: true,
        };
    }

    let last_unit = issued.saturating_add(units);
    let total_cost = cost_of_units(curve, issued, units);
    let within_domain = curve
        .domain_end()
        .is_some_and(|end| last_unit as f64 <= end);

    if !within_domain {
        tracing::debug!(
            issued,
            units,
            domain_end = ?curve.domain_end(),
            "Bond request extends past the curve domain"
        );
    }

    BondPreview {
        issued,
        units,
        total_cost,
        average_price: total_cost / units as f64,
        first_unit_price: curve.price(issued.saturating_add(1) as f64),
        last_unit_price: curve.price(last_unit as f64),
        within_domain,
    }
}

/// Preview unbonding `units` of `issued` units
pub fn preview_unbond(curve: &Curve, issued: u64, units: u64) -> Result<UnbondPreview, CurveError> {
    let total_refund = refund_of_units(curve, issued, units)?;
    let average_price = if units > 0 {
        total_refund / units as f64
    } else {
        0.0
    };

    Ok(UnbondPreview {
        issued,
        units,
        total_refund,
        average_price,
    })
}
