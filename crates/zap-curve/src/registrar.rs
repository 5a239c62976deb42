//! Curve registration
//!
//! Hands an encoded curve to the ledger-submission collaborator. The
//! collaborator (RPC client, ABI binding, signing) lives outside this crate;
//! only the request shape and the trait boundary are defined here.

use serde::{Deserialize, Serialize};

use zap_core::{CurveConfig, Endpoint, LedgerError, TxHash};

use crate::curve::{validate_definition, Curve};
use crate::encoding::FixedPointTriples;
use crate::state::CurveError;

/// Registry `initiateProviderCurve` call arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitCurveRequest {
    pub endpoint: Endpoint,
    pub triples: FixedPointTriples,
}

/// Submits curve initialization calls to the ledger
pub trait CurveRegistrar {
    fn init_curve(&self, request: &InitCurveRequest) -> Result<TxHash, LedgerError>;
}

/// Encode `curve` with the configured fixed-point exponent and submit it.
///
/// In strict mode the curve definition is validated before anything is sent.
pub fn submit_curve<R: CurveRegistrar + ?Sized>(
    registrar: &R,
    endpoint: Endpoint,
    curve: &Curve,
    config: &CurveConfig,
) -> Result<TxHash, CurveError> {
    if config.is_strict() {
        validate_definition(curve.definition())?;
    }

    let triples = curve.to_fixed_point_triples(config.fixed_point_decimals)?;
    let request = InitCurveRequest { endpoint, triples };

    tracing::info!(
        endpoint = %request.endpoint,
        segments = curve.segments().len(),
        terms = curve.term_count(),
        "Submitting curve initialization"
    );

    match registrar.init_curve(&request) {
        Ok(tx_hash) => {
            tracing::info!(tx_hash = %tx_hash, "Curve initialization submitted");
            Ok(tx_hash)
        }
        Err(e) => {
            tracing::warn!("Curve initialization failed: {}", e);
            Err(e.into())
        }
    }
}
