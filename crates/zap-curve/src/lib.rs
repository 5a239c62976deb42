//! Bonding Curve Engine
//!
//! Client-side mirror of the on-chain piecewise bonding curve. A curve is
//! defined by three flattened arrays (constants, parts, dividers) and prices
//! the next bound unit given how many are already bound. Client and contract
//! must agree on every price, so evaluation follows the on-chain rules exactly.
//!
//! # Example
//!
//! ```
//! use zap_curve::Curve;
//!
//! // price = x on [0, 100]
//! let curve = Curve::new(vec![1.0, 1.0, 0.0], vec![0.0, 100.0], vec![1]);
//! assert_eq!(curve.price(10.0), 10.0);
//! assert_eq!(curve.price(150.0), 0.0);
//! ```

pub mod calculator;
pub mod constants;
pub mod curve;
pub mod encoding;
pub mod registrar;
pub mod state;

// Re-exports
pub use calculator::{cost_of_units, preview_bond, preview_unbond, refund_of_units};
pub use curve::{validate_definition, Curve};
pub use encoding::{decode_word, encode_word, FixedPointTriples};
pub use registrar::{submit_curve, CurveRegistrar, InitCurveRequest};
pub use state::{BondPreview, CurveDefinition, CurveError, FunctionKind, Segment, Term, UnbondPreview};
pub use zap_core::{CurveConfig, ValidationMode};
