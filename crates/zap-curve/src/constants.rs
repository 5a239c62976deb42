//! Curve Encoding Constants
//!
//! Layout of the flattened constants/parts/dividers arrays and the
//! function-kind wire codes shared with the on-chain evaluator.

/// Values per term group in `constants`: (coefficient, power, function)
pub const TERM_WIDTH: usize = 3;

/// Values per segment in `parts`: (start, end)
pub const BOUND_WIDTH: usize = 2;

/// Term group layout
pub mod term_layout {
    pub const COEFFICIENT: usize = 0;
    pub const POWER: usize = 1;
    pub const FUNCTION: usize = 2;
}

/// Function-kind wire codes
pub mod function_codes {
    /// Absolute value of the input
    pub const ABS: f64 = 0.0;
    /// Base-2 logarithm of the input (negative inputs clamp to 0)
    pub const LOG2: f64 = 1.0;
    /// Input passes through unchanged. Any code other than ABS/LOG2 decodes
    /// to identity; this is the value written when encoding.
    pub const IDENTITY: f64 = 2.0;
}

/// Size of a fixed-point word in bytes (one 256-bit EVM slot)
pub const WORD_BYTES: usize = 32;
