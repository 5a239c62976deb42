//! Bonding Curve Engine
//!
//! Structures a flattened curve definition into ordered segments once at
//! construction, then prices any bound-units count against them. No I/O,
//! no mutation after construction.
//!
//! # Encoding
//!
//! - `constants`: (coefficient, power, function) per term, segments in order
//! - `parts`: (start, end) per segment, both bounds inclusive
//! - `dividers`: cumulative term count through each segment, so segment `i`
//!   owns term groups `[dividers[i-1], dividers[i])`
//!
//! Segments may overlap or leave gaps; the first segment containing the input
//! wins and inputs outside every segment price at 0.

use zap_core::{CurveConfig, ValidationMode};

use crate::constants::{BOUND_WIDTH, TERM_WIDTH};
use crate::state::{CurveDefinition, CurveError, FunctionKind, Segment, Term};

/// Piecewise bonding curve
#[derive(Debug, Clone)]
pub struct Curve {
    definition: CurveDefinition,
    segments: Vec<Segment>,
}

impl Curve {
    /// Build a curve from raw arrays with legacy semantics: malformed arrays
    /// never fail, they produce truncated or empty segments.
    pub fn new(constants: Vec<f64>, parts: Vec<f64>, dividers: Vec<usize>) -> Self {
        Self::from_definition(CurveDefinition::new(constants, parts, dividers))
    }

    /// Build a curve with legacy semantics
    pub fn from_definition(definition: CurveDefinition) -> Self {
        let segments = structurize(&definition);
        Self {
            definition,
            segments,
        }
    }

    /// Build a curve, rejecting malformed definitions when `config` is strict
    pub fn with_config(
        definition: CurveDefinition,
        config: &CurveConfig,
    ) -> Result<Self, CurveError> {
        match config.validation {
            ValidationMode::Strict => Self::strict(definition),
            ValidationMode::Legacy => Ok(Self::from_definition(definition)),
        }
    }

    /// Build a curve, rejecting malformed definitions
    pub fn strict(definition: CurveDefinition) -> Result<Self, CurveError> {
        if let Err(e) = validate_definition(&definition) {
            tracing::warn!("Rejected curve definition: {}", e);
            return Err(e);
        }
        Ok(Self::from_definition(definition))
    }

    pub fn definition(&self) -> &CurveDefinition {
        &self.definition
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of terms across all segments
    pub fn term_count(&self) -> usize {
        self.segments.iter().map(|s| s.terms.len()).sum()
    }

    /// Largest segment end, i.e. the most bound units the curve prices.
    /// None for an empty curve.
    pub fn domain_end(&self) -> Option<f64> {
        self.segments.iter().map(|s| s.end).reduce(f64::max)
    }

    /// Marginal price at `total` bound units.
    ///
    /// Returns 0 for negative input, for an empty curve, and when no segment
    /// contains `total`. Non-finite term results (e.g. log2 of 0) propagate.
    pub fn price(&self, total: f64) -> f64 {
        if total < 0.0 || self.segments.is_empty() {
            return 0.0;
        }

        self.segments
            .iter()
            .find(|segment| segment.contains(total))
            .map_or(0.0, |segment| segment.evaluate(total))
    }
}

/// Split the flattened arrays into segments, walking the cumulative dividers
/// with a running cursor.
fn structurize(definition: &CurveDefinition) -> Vec<Segment> {
    let terms: Vec<Term> = definition
        .constants
        .chunks_exact(TERM_WIDTH)
        .map(Term::from_group)
        .collect();

    if definition.constants.len() % TERM_WIDTH != 0 {
        tracing::warn!(
            constants = definition.constants.len(),
            "Trailing constants do not form a full term group, ignoring them"
        );
    }

    let mut segments = Vec::with_capacity(definition.dividers.len());
    let mut previous_divider = 0usize;

    for (i, &divider) in definition.dividers.iter().enumerate() {
        let from = previous_divider.min(terms.len());
        let to = divider.min(terms.len());
        previous_divider = divider;

        if divider > terms.len() {
            tracing::warn!(
                segment = i,
                divider,
                available = terms.len(),
                "Divider runs past the defined terms, truncating segment"
            );
        }

        let bounds = definition
            .parts
            .get(BOUND_WIDTH * i..BOUND_WIDTH * (i + 1));
        let Some(&[start, end]) = bounds else {
            // Missing bounds never match any input
            tracing::warn!(segment = i, "Segment has no bounds, skipping");
            continue;
        };

        let segment_terms = if from < to {
            terms[from..to].to_vec()
        } else {
            Vec::new()
        };

        segments.push(Segment {
            start,
            end,
            terms: segment_terms,
        });
    }

    tracing::debug!(
        segments = segments.len(),
        terms = terms.len(),
        "Structurized bonding curve"
    );

    segments
}

/// Check that a definition is well formed.
///
/// Rules: at least one segment; `parts` holds exactly two bounds per segment;
/// dividers strictly increase (every segment owns a term); `constants` holds
/// exactly `3 * last divider` values; bounds are finite with `start <= end`;
/// coefficients are finite; powers are finite and non-negative; function
/// codes are 0, 1 or 2.
pub fn validate_definition(definition: &CurveDefinition) -> Result<(), CurveError> {
    let CurveDefinition {
        constants,
        parts,
        dividers,
    } = definition;

    let Some(&last_divider) = dividers.last() else {
        return Err(CurveError::invalid("curve has no segments"));
    };

    if parts.len() != BOUND_WIDTH * dividers.len() {
        return Err(CurveError::invalid(format!(
            "expected {} part values for {} segments, got {}",
            BOUND_WIDTH * dividers.len(),
            dividers.len(),
            parts.len()
        )));
    }

    let mut previous = 0usize;
    for (i, &divider) in dividers.iter().enumerate() {
        if divider <= previous {
            return Err(CurveError::invalid(format!(
                "divider {} ({}) must be greater than {}",
                i, divider, previous
            )));
        }
        previous = divider;
    }

    let expected_constants = last_divider
        .checked_mul(TERM_WIDTH)
        .ok_or_else(|| CurveError::invalid("divider too large"))?;
    if constants.len() != expected_constants {
        return Err(CurveError::invalid(format!(
            "expected {} constants for {} terms, got {}",
            expected_constants,
            last_divider,
            constants.len()
        )));
    }

    for (i, bounds) in parts.chunks_exact(BOUND_WIDTH).enumerate() {
        let (start, end) = (bounds[0], bounds[1]);
        if !start.is_finite() || !end.is_finite() {
            return Err(CurveError::invalid(format!(
                "segment {} has non-finite bounds",
                i
            )));
        }
        if start > end {
            return Err(CurveError::invalid(format!(
                "segment {} starts at {} after its end {}",
                i, start, end
            )));
        }
    }

    for (i, group) in constants.chunks_exact(TERM_WIDTH).enumerate() {
        let (coefficient, power, code) = (group[0], group[1], group[2]);
        if !coefficient.is_finite() {
            return Err(CurveError::invalid(format!(
                "term {} has a non-finite coefficient",
                i
            )));
        }
        if !power.is_finite() || power < 0.0 {
            return Err(CurveError::invalid(format!(
                "term {} has invalid power {}",
                i, power
            )));
        }
        if FunctionKind::from_code_strict(code).is_none() {
            return Err(CurveError::invalid(format!(
                "term {} has unknown function code {}",
                i, code
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> Curve {
        Curve::new(vec![1.0, 1.0, 0.0], vec![0.0, 100.0], vec![1])
    }

    #[test]
    fn test_linear_scenario() {
        let curve = linear();
        assert_eq!(curve.price(10.0), 10.0);
        assert_eq!(curve.price(0.0), 0.0);
        assert_eq!(curve.price(100.0), 100.0);
        assert_eq!(curve.price(150.0), 0.0);
    }

    #[test]
    fn test_negative_total_is_zero() {
        let curve = Curve::new(vec![5.0, 0.0, 2.0], vec![-10.0, 10.0], vec![1]);
        // Segment covers -1, but negative totals short-circuit
        assert_eq!(curve.price(-1.0), 0.0);
        assert_eq!(curve.price(1.0), 5.0);
    }

    #[test]
    fn test_empty_curve_is_zero() {
        let curve = Curve::new(vec![], vec![], vec![]);
        assert!(curve.is_empty());
        assert_eq!(curve.price(1.0), 0.0);
        assert_eq!(curve.domain_end(), None);
    }

    #[test]
    fn test_identity_power() {
        // 3 * x^2
        let curve = Curve::new(vec![3.0, 2.0, 2.0], vec![0.0, 50.0], vec![1]);
        for t in [0.0, 1.0, 7.0, 50.0] {
            assert_eq!(curve.price(t), 3.0 * t.powf(2.0));
        }
    }

    #[test]
    fn test_zero_power_at_zero() {
        let curve = Curve::new(vec![9.0, 0.0, 2.0], vec![0.0, 10.0], vec![1]);
        assert_eq!(curve.price(0.0), 9.0);
    }

    #[test]
    fn test_abs_term() {
        let curve = Curve::new(vec![2.0, 3.0, 0.0], vec![0.0, 10.0], vec![1]);
        assert_eq!(curve.price(4.0), 2.0 * 64.0);
    }

    #[test]
    fn test_log2_term() {
        // 5 * log2(x)^2
        let curve = Curve::new(vec![5.0, 2.0, 1.0], vec![0.0, 1024.0], vec![1]);
        assert_eq!(curve.price(8.0), 5.0 * 9.0);
        assert_eq!(curve.price(1024.0), 5.0 * 100.0);
    }

    #[test]
    fn test_log2_at_zero_propagates() {
        let curve = Curve::new(vec![1.0, 1.0, 1.0], vec![0.0, 10.0], vec![1]);
        assert_eq!(curve.price(0.0), f64::NEG_INFINITY);

        // Even powers of -inf are +inf
        let curve = Curve::new(vec![1.0, 2.0, 1.0], vec![0.0, 10.0], vec![1]);
        assert_eq!(curve.price(0.0), f64::INFINITY);
    }

    #[test]
    fn test_multi_term_sum() {
        // 2x^2 + |x| + 3
        let curve = Curve::new(
            vec![2.0, 2.0, 2.0, 1.0, 1.0, 0.0, 3.0, 0.0, 2.0],
            vec![0.0, 10.0],
            vec![3],
        );
        assert_eq!(curve.term_count(), 3);
        assert_eq!(curve.price(5.0), 2.0 * 25.0 + 5.0 + 3.0);
    }

    #[test]
    fn test_multi_term_square_plus_abs() {
        // 2x^2 + |x|
        let curve = Curve::new(vec![2.0, 2.0, 2.0, 1.0, 1.0, 0.0], vec![0.0, 10.0], vec![2]);
        assert_eq!(curve.price(5.0), 55.0);
    }

    #[test]
    fn test_multi_term_abs_and_log2_codes() {
        // 2|x|^2 + log2(x)
        let curve = Curve::new(vec![2.0, 2.0, 0.0, 1.0, 1.0, 1.0], vec![0.0, 10.0], vec![2]);
        assert_eq!(curve.price(8.0), 2.0 * 64.0 + 3.0);
    }

    #[test]
    fn test_cumulative_dividers() {
        // Segment 0: terms [0, 1) -> x
        // Segment 1: terms [1, 3) -> 2x + 10
        // Segment 2: terms [3, 4) -> 100
        let curve = Curve::new(
            vec![
                1.0, 1.0, 2.0, //
                2.0, 1.0, 2.0, //
                10.0, 0.0, 2.0, //
                100.0, 0.0, 2.0,
            ],
            vec![0.0, 10.0, 11.0, 20.0, 21.0, 30.0],
            vec![1, 3, 4],
        );

        let segments = curve.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].terms.len(), 1);
        assert_eq!(segments[1].terms.len(), 2);
        assert_eq!(segments[2].terms.len(), 1);

        assert_eq!(curve.price(5.0), 5.0);
        assert_eq!(curve.price(15.0), 40.0);
        assert_eq!(curve.price(25.0), 100.0);
        // Gap between segments
        assert_eq!(curve.price(10.5), 0.0);
        assert_eq!(curve.domain_end(), Some(30.0));
    }

    #[test]
    fn test_shared_boundary_first_segment_wins() {
        let curve = Curve::new(
            vec![1.0, 0.0, 2.0, 2.0, 0.0, 2.0],
            vec![0.0, 5.0, 5.0, 10.0],
            vec![1, 2],
        );
        assert_eq!(curve.price(5.0), 1.0);
        assert_eq!(curve.price(6.0), 2.0);
    }

    #[test]
    fn test_overlapping_segments_first_wins() {
        let curve = Curve::new(
            vec![1.0, 0.0, 2.0, 2.0, 0.0, 2.0],
            vec![0.0, 10.0, 0.0, 20.0],
            vec![1, 2],
        );
        assert_eq!(curve.price(7.0), 1.0);
        assert_eq!(curve.price(15.0), 2.0);
    }

    #[test]
    fn test_legacy_non_increasing_divider_gives_empty_segment() {
        let curve = Curve::new(
            vec![1.0, 1.0, 2.0, 3.0, 0.0, 2.0],
            vec![0.0, 10.0, 11.0, 20.0, 21.0, 30.0],
            vec![2, 1, 2],
        );
        let segments = curve.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].terms.len(), 2);
        assert!(segments[1].terms.is_empty());
        assert_eq!(segments[2].terms.len(), 1);
        assert_eq!(curve.price(15.0), 0.0);
        assert_eq!(curve.price(25.0), 3.0);
    }

    #[test]
    fn test_legacy_short_constants_truncate() {
        let curve = Curve::new(vec![1.0, 1.0, 2.0, 4.0], vec![0.0, 10.0], vec![2]);
        assert_eq!(curve.term_count(), 1);
        assert_eq!(curve.price(3.0), 3.0);
    }

    #[test]
    fn test_legacy_missing_parts_skip_segment() {
        let curve = Curve::new(
            vec![1.0, 1.0, 2.0, 5.0, 0.0, 2.0],
            vec![0.0, 10.0, 11.0],
            vec![1, 2],
        );
        assert_eq!(curve.segments().len(), 1);
        assert_eq!(curve.price(15.0), 0.0);
    }

    #[test]
    fn test_legacy_unknown_function_code_is_identity() {
        let curve = Curve::new(vec![1.0, 1.0, 42.0], vec![-10.0, 10.0], vec![1]);
        assert_eq!(curve.segments()[0].terms[0].function, FunctionKind::Identity);
        assert_eq!(curve.price(4.0), 4.0);
    }

    #[test]
    fn test_strict_accepts_well_formed() {
        let def = CurveDefinition::new(
            vec![1.0, 1.0, 2.0, 2.0, 2.0, 0.0],
            vec![0.0, 5.0, 6.0, 10.0],
            vec![1, 2],
        );
        let curve = Curve::strict(def).unwrap();
        assert_eq!(curve.price(8.0), 128.0);
    }

    #[test]
    fn test_strict_rejects_malformed() {
        let cases = vec![
            CurveDefinition::new(vec![], vec![], vec![]),
            // parts length mismatch
            CurveDefinition::new(vec![1.0, 1.0, 2.0], vec![0.0], vec![1]),
            // constants length mismatch
            CurveDefinition::new(vec![1.0, 1.0, 2.0, 1.0], vec![0.0, 1.0], vec![1]),
            // non-increasing dividers
            CurveDefinition::new(
                vec![1.0, 1.0, 2.0, 1.0, 1.0, 2.0],
                vec![0.0, 1.0, 2.0, 3.0],
                vec![2, 2],
            ),
            // start after end
            CurveDefinition::new(vec![1.0, 1.0, 2.0], vec![5.0, 1.0], vec![1]),
            // negative power
            CurveDefinition::new(vec![1.0, -1.0, 2.0], vec![0.0, 1.0], vec![1]),
            // unknown function code
            CurveDefinition::new(vec![1.0, 1.0, 3.0], vec![0.0, 1.0], vec![1]),
            // non-finite coefficient
            CurveDefinition::new(vec![f64::NAN, 1.0, 2.0], vec![0.0, 1.0], vec![1]),
        ];

        for def in cases {
            let err = Curve::strict(def.clone()).unwrap_err();
            assert_eq!(err.error_code(), "invalid_curve_definition", "{:?}", def);
        }
    }

    #[test]
    fn test_with_config_modes() {
        let malformed = CurveDefinition::new(vec![1.0, 1.0, 2.0], vec![0.0, 10.0], vec![2]);

        let legacy = Curve::with_config(malformed.clone(), &CurveConfig::default()).unwrap();
        assert_eq!(legacy.price(4.0), 4.0);

        assert!(Curve::with_config(malformed, &CurveConfig::strict()).is_err());
    }

    #[test]
    fn test_curve_is_shareable_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let curve = Arc::new(Curve::new(vec![2.0, 1.0, 2.0], vec![0.0, 1000.0], vec![1]));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let curve = Arc::clone(&curve);
                thread::spawn(move || curve.price((i * 10) as f64))
            })
            .collect();

        let prices: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(prices, vec![0.0, 20.0, 40.0, 60.0]);
    }
}
