//! Error types for formula evaluation.

use thiserror::Error;

/// Errors raised during per-pixel evaluation.
///
/// Only produced under [`crate::Fallthrough::Fail`]; the default policy
/// never errors on unmatched values.
#[derive(Error, Debug)]
pub enum EvalError {
    /// A raw code matched no entry of its correspondence table.
    #[error("no {layer} table entry for code {code} at pixel {index}")]
    UnmatchedCode {
        layer: &'static str,
        code: f32,
        index: usize,
    },

    /// A clay/sand pair fell outside every erodibility band.
    #[error("no erodibility band for clay {clay}%, sand {sand}% at pixel {index}")]
    UnmatchedBand { clay: f32, sand: f32, index: usize },
}

/// Result type for formula evaluation.
pub type Result<T> = std::result::Result<T, EvalError>;
