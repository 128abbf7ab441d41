//! CRUS runoff-sensitivity formula.
//!
//! Per pixel: the slope class is reclassed through a correspondence table,
//! then blended with permeability and land-cover scores under two weight
//! sets (with and without slope influence), each optionally multiplied by
//! the crusting ("battance") coefficient. The four blends are quantized
//! into ordinal risk classes and compared pairwise into a packed difference
//! code.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::tables::CorrespondenceTable;
use crate::Fallthrough;

/// Base of the packed difference code; the four pairwise-equality bits are
/// added on top with weights 1000/100/10/1.
pub const DIFF_BASE: f32 = 20000.0;

/// Weights of the slope/permeability/land-cover blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub slope: f32,
    pub permeability: f32,
    pub land_cover: f32,
}

impl BlendWeights {
    fn blend(&self, slope: f32, permeability: f32, land_cover: f32) -> f32 {
        self.slope * slope + self.permeability * permeability + self.land_cover * land_cover
    }
}

/// Tunable constants of the runoff formula.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunoffParams {
    /// Blend with slope influence.
    pub slope_weights: BlendWeights,
    /// Blend with slope zeroed out.
    pub flat_weights: BlendWeights,
    /// Upper bounds (inclusive) of risk classes 0, 1 and 2.
    pub class_breaks: [f32; 3],
    pub fallthrough: Fallthrough,
    /// Sentinel for the four class outputs of a no-data pixel.
    pub class_nodata: f32,
    /// Sentinel for the difference plane; out-of-band with respect to the
    /// valid packed codes.
    pub diff_nodata: f32,
}

impl Default for RunoffParams {
    fn default() -> Self {
        Self {
            slope_weights: BlendWeights {
                slope: 0.40,
                permeability: 0.35,
                land_cover: 0.25,
            },
            flat_weights: BlendWeights {
                slope: 0.0,
                permeability: 0.60,
                land_cover: 0.40,
            },
            class_breaks: [32.0, 42.0, 55.0],
            fallthrough: Fallthrough::RetainDefault,
            class_nodata: -1.0,
            diff_nodata: 91111.0,
        }
    }
}

/// Same-position input values for one pixel.
#[derive(Debug, Clone, Copy)]
pub struct RunoffContext {
    /// Raw slope-class code; the no-data reference layer.
    pub slope_class: f32,
    pub permeability: f32,
    pub land_cover: f32,
    /// Raw crusting-susceptibility code, keyed into the battance table.
    pub battance: f32,
}

/// Quantize a blend score into an ordinal risk class.
///
/// `< 0` maps to the sentinel -1; the breaks are inclusive upper bounds
/// (a score of exactly 32 is still class 0).
pub fn classify(score: f32, breaks: &[f32; 3]) -> f32 {
    if score < 0.0 {
        -1.0
    } else if score <= breaks[0] {
        0.0
    } else if score <= breaks[1] {
        1.0
    } else if score <= breaks[2] {
        2.0
    } else {
        3.0
    }
}

/// Pack four pairwise-equality outcomes into one difference code.
///
/// `DIFF_BASE + 1000*a + 100*b + 10*c + d` where
/// a = crusted/slope == bare/slope, b = crusted/flat == bare/flat,
/// c = crusted/slope == crusted/flat, d = bare/slope == bare/flat.
pub fn diff_code(a: bool, b: bool, c: bool, d: bool) -> f32 {
    let bit = |set: bool| if set { 1.0 } else { 0.0 };
    DIFF_BASE + 1000.0 * bit(a) + 100.0 * bit(b) + 10.0 * bit(c) + bit(d)
}

/// The runoff-sensitivity pixel formula.
///
/// Immutable once built; shared read-only across all evaluation workers.
pub struct RunoffFormula {
    reclass_table: CorrespondenceTable,
    battance_table: CorrespondenceTable,
    params: RunoffParams,
    reference_nodata: Option<f32>,
}

impl RunoffFormula {
    /// Build a formula from the slope-reclass and battance tables and the
    /// reference layer's declared no-data sentinel.
    pub fn new(
        reclass_table: CorrespondenceTable,
        battance_table: CorrespondenceTable,
        params: RunoffParams,
        reference_nodata: Option<f32>,
    ) -> Self {
        Self {
            reclass_table,
            battance_table,
            params,
            reference_nodata,
        }
    }

    /// Evaluate one pixel.
    ///
    /// Returns `[crust_slope, crust_flat, bare_slope, bare_flat, diff]`:
    /// the four quantized risk classes followed by the packed difference
    /// code. No-data dominance comes first and forces every plane to its
    /// sentinel.
    pub fn eval(&self, index: usize, ctx: RunoffContext) -> Result<[f32; 5]> {
        let params = &self.params;

        if let Some(sentinel) = self.reference_nodata {
            if ctx.slope_class == sentinel {
                let nd = params.class_nodata;
                return Ok([nd, nd, nd, nd, params.diff_nodata]);
            }
        }

        let slope = match self.reclass_table.lookup(ctx.slope_class) {
            Some(value) => value as f32,
            None => match params.fallthrough {
                // An unknown class keeps the raw code.
                Fallthrough::RetainDefault => ctx.slope_class,
                Fallthrough::Fail => {
                    return Err(EvalError::UnmatchedCode {
                        layer: "slope-class",
                        code: ctx.slope_class,
                        index,
                    })
                }
            },
        };

        let bare_slope_score = params
            .slope_weights
            .blend(slope, ctx.permeability, ctx.land_cover);
        let bare_flat_score = params
            .flat_weights
            .blend(slope, ctx.permeability, ctx.land_cover);

        let (crust_slope_score, crust_flat_score) = match self.battance_table.lookup(ctx.battance)
        {
            Some(coefficient) => {
                let coefficient = coefficient as f32;
                (
                    coefficient * bare_slope_score / 100.0,
                    coefficient * bare_flat_score / 100.0,
                )
            }
            None => match params.fallthrough {
                // An unknown crusting code leaves the crusted planes at
                // their pre-filled value, the raw land-cover score, which
                // then flows through quantization.
                Fallthrough::RetainDefault => (ctx.land_cover, ctx.land_cover),
                Fallthrough::Fail => {
                    return Err(EvalError::UnmatchedCode {
                        layer: "battance",
                        code: ctx.battance,
                        index,
                    })
                }
            },
        };

        let crust_slope = classify(crust_slope_score, &params.class_breaks);
        let crust_flat = classify(crust_flat_score, &params.class_breaks);
        let bare_slope = classify(bare_slope_score, &params.class_breaks);
        let bare_flat = classify(bare_flat_score, &params.class_breaks);

        let diff = diff_code(
            crust_slope == bare_slope,
            crust_flat == bare_flat,
            crust_slope == crust_flat,
            bare_slope == bare_flat,
        );

        Ok([crust_slope, crust_flat, bare_slope, bare_flat, diff])
    }
}
