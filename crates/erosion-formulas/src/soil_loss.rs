//! RUSLE-style soil-loss formula: `A = R * K * C * LS`.
//!
//! Per pixel: the cover/management coefficient `C` comes from a land-cover
//! correspondence table, the erodibility `K` from disjoint clay/sand bands,
//! and `LS` from the slope in degrees. Outputs are the loss in tonnes per
//! hectare, the same mass per pixel in kilograms, and the eroded soil
//! thickness in metres.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::tables::CorrespondenceTable;
use crate::Fallthrough;

/// How the combined slope-length/steepness factor is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LsMode {
    /// Quadratic fit in slope degrees, scaled for 5 m pixels:
    /// `(0.065 + 0.0456*p + 0.006541*p^2) * (25/22.1)^0.5`.
    #[default]
    Quadratic,
    /// Older split form: `L = 1.4*(5/22.13)^0.4`, `S = (sin p / 0.0896)^1.3`.
    Legacy,
}

/// Tunable constants of the soil-loss formula.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SoilLossParams {
    pub ls_mode: LsMode,
    /// Soil bulk density in kg/m3, used for the thickness conversion.
    pub bulk_density: f32,
    /// Pixel area in m2 (5 m grids: 25 m2).
    pub pixel_area_m2: f32,
    /// Cover coefficient kept when the land-cover code matches no entry.
    pub default_c: f32,
    /// Erodibility kept when the clay/sand pair matches no band.
    pub default_k: f32,
    pub fallthrough: Fallthrough,
    /// Sentinel written to every output of a no-data pixel.
    pub output_nodata: f32,
}

impl Default for SoilLossParams {
    fn default() -> Self {
        Self {
            ls_mode: LsMode::Quadratic,
            bulk_density: 1250.0,
            pixel_area_m2: 25.0,
            default_c: 0.0,
            default_k: 0.0,
            fallthrough: Fallthrough::RetainDefault,
            output_nodata: -1.0,
        }
    }
}

/// Same-position input values for one pixel.
#[derive(Debug, Clone, Copy)]
pub struct SoilLossContext {
    /// Rainfall erosivity R.
    pub erosivity: f32,
    /// Slope in degrees; the no-data reference layer.
    pub slope_deg: f32,
    pub clay_pct: f32,
    /// Aligned and carried with the soil fractions, unused by the closed
    /// form.
    pub silt_pct: f32,
    pub sand_pct: f32,
    /// Raw land-cover code, keyed into the cover table.
    pub land_cover: f32,
}

/// Soil erodibility `K` from the disjoint clay/sand bands.
///
/// Boundary values (clay exactly 18, 35 or 60; sand exactly 15 or 65) fall
/// outside every band and return `None`; the strict inequalities are part
/// of the published coefficients, not an implementation choice.
pub fn erodibility_band(clay_pct: f32, sand_pct: f32) -> Option<f32> {
    if clay_pct < 18.0 && sand_pct > 65.0 {
        Some(0.0115)
    } else if clay_pct > 18.0 && clay_pct < 35.0 && sand_pct > 65.0 {
        Some(0.0311)
    } else if clay_pct < 35.0 && sand_pct < 15.0 {
        Some(0.0438)
    } else if clay_pct > 35.0 && clay_pct < 60.0 {
        Some(0.0339)
    } else if clay_pct > 60.0 {
        Some(0.0170)
    } else {
        None
    }
}

/// The soil-loss pixel formula.
///
/// Immutable once built; shared read-only across all evaluation workers.
pub struct SoilLossFormula {
    cover_table: CorrespondenceTable,
    params: SoilLossParams,
    reference_nodata: Option<f32>,
}

impl SoilLossFormula {
    /// Build a formula from the land-cover table and the reference layer's
    /// declared no-data sentinel.
    pub fn new(
        cover_table: CorrespondenceTable,
        params: SoilLossParams,
        reference_nodata: Option<f32>,
    ) -> Self {
        Self {
            cover_table,
            params,
            reference_nodata,
        }
    }

    /// Evaluate one pixel.
    ///
    /// Returns `[loss_t_ha, loss_kg_px, depth_m]`. No-data dominance comes
    /// first: a no-data slope forces every output to the sentinel before any
    /// lookup runs.
    pub fn eval(&self, index: usize, ctx: SoilLossContext) -> Result<[f32; 3]> {
        if let Some(sentinel) = self.reference_nodata {
            if ctx.slope_deg == sentinel {
                let nd = self.params.output_nodata;
                return Ok([nd, nd, nd]);
            }
        }

        let c = match self.cover_table.lookup(ctx.land_cover) {
            Some(value) => value as f32,
            None => match self.params.fallthrough {
                Fallthrough::RetainDefault => self.params.default_c,
                Fallthrough::Fail => {
                    return Err(EvalError::UnmatchedCode {
                        layer: "land-cover",
                        code: ctx.land_cover,
                        index,
                    })
                }
            },
        };

        let k = match erodibility_band(ctx.clay_pct, ctx.sand_pct) {
            Some(value) => value,
            None => match self.params.fallthrough {
                Fallthrough::RetainDefault => self.params.default_k,
                Fallthrough::Fail => {
                    return Err(EvalError::UnmatchedBand {
                        clay: ctx.clay_pct,
                        sand: ctx.sand_pct,
                        index,
                    })
                }
            },
        };

        let ls = self.ls_factor(ctx.slope_deg);

        let loss_t_ha = ctx.erosivity * k * c * ls;
        let pixel_hectares = self.params.pixel_area_m2 / 10_000.0;
        let loss_kg_px = loss_t_ha * pixel_hectares * 1000.0;
        let depth_m = (loss_kg_px / self.params.bulk_density) / self.params.pixel_area_m2;

        Ok([loss_t_ha, loss_kg_px, depth_m])
    }

    fn ls_factor(&self, slope_deg: f32) -> f32 {
        match self.params.ls_mode {
            LsMode::Quadratic => {
                (0.065 + 0.0456 * slope_deg + 0.006541 * slope_deg * slope_deg) * 1.063_589
            }
            LsMode::Legacy => {
                let l = 1.4 * (5.0_f32 / 22.13).powf(0.4);
                let s = (slope_deg.sin() / 0.0896).powf(1.3);
                l * s
            }
        }
    }
}
