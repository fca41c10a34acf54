//! Error types raised while validating scoring weights.
#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised when a weight set cannot be used for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightsError {
    /// A weight was NaN or infinite.
    #[error("weight `{field}` must be finite")]
    NonFinite {
        /// Name of the offending weight.
        field: &'static str,
    },
    /// A weight was below zero. Penalties and bonuses are magnitudes.
    #[error("weight `{field}` must not be negative")]
    Negative {
        /// Name of the offending weight.
        field: &'static str,
    },
}
