//! Per-pixel formulas for soil-loss and runoff-sensitivity mapping.
//!
//! Each formula is a pure scalar function of the same-position values drawn
//! from the aligned input grids: coefficients resolved through small
//! correspondence tables, piecewise numeric branching, and a closed-form
//! combination, with no-data dominance overriding every other branch. The
//! functions carry no state across pixels and are safe to dispatch through
//! `pixel-eval` at any chunking.

mod error;
mod runoff;
mod soil_loss;
mod tables;

pub use error::{EvalError, Result};
pub use runoff::{
    classify, diff_code, BlendWeights, RunoffContext, RunoffFormula, RunoffParams, DIFF_BASE,
};
pub use soil_loss::{erodibility_band, LsMode, SoilLossContext, SoilLossFormula, SoilLossParams};
pub use tables::{CorrespondenceTable, TableError};

use serde::{Deserialize, Serialize};

/// What to do when a pixel value matches no correspondence-table entry or
/// no erodibility band.
///
/// By default a miss is a silent no-op: the affected coefficient keeps its
/// default (or the pre-filled score, for the crusted runoff variants).
/// `Fail` instead surfaces the miss as an evaluation error naming the
/// pixel, for datasets where a miss means a broken table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallthrough {
    /// Keep the default/pre-filled value and continue.
    #[default]
    RetainDefault,
    /// Abort the evaluation on the first unmatched value.
    Fail,
}
