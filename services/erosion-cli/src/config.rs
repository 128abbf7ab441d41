//! Run configuration.
//!
//! Every knob of a batch run (input raster paths, correspondence-table
//! paths, output locations, the chunk limit and the lookup fall-through
//! policy) lives in one YAML document loaded and validated before any
//! raster is opened.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use erosion_formulas::{Fallthrough, LsMode};
use serde::Deserialize;

/// Top-level run configuration.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    /// Upper bound on pixels evaluated per chunk.
    #[serde(default = "default_chunk_limit")]
    pub chunk_limit: usize,

    /// Policy for values that match no table entry or coefficient band.
    #[serde(default)]
    pub fallthrough: Fallthrough,

    /// The job to run.
    pub job: JobConfig,
}

fn default_chunk_limit() -> usize {
    pixel_eval::DEFAULT_CHUNK_LIMIT
}

/// Job selector with its per-kind settings.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum JobConfig {
    SoilLoss(SoilLossJob),
    Runoff(RunoffJob),
}

/// Soil-loss (RUSLE) job settings.
#[derive(Debug, Deserialize)]
pub struct SoilLossJob {
    pub inputs: SoilLossInputs,
    /// Land-cover code -> cover coefficient C, float `key=value` table.
    pub cover_table: PathBuf,
    #[serde(default)]
    pub ls_mode: LsMode,
    #[serde(default = "default_bulk_density")]
    pub bulk_density: f32,
    #[serde(default = "default_pixel_area")]
    pub pixel_area_m2: f32,
    pub outputs: SoilLossOutputs,
}

fn default_bulk_density() -> f32 {
    1250.0
}

fn default_pixel_area() -> f32 {
    25.0
}

/// Input raster paths for a soil-loss job.
#[derive(Debug, Deserialize)]
pub struct SoilLossInputs {
    pub erosivity: PathBuf,
    /// Slope in degrees; the no-data reference layer.
    pub slope: PathBuf,
    pub clay: PathBuf,
    pub silt: PathBuf,
    pub sand: PathBuf,
    pub land_cover: PathBuf,
}

/// Output raster paths for a soil-loss job.
#[derive(Debug, Deserialize)]
pub struct SoilLossOutputs {
    pub loss_t_ha: PathBuf,
    pub loss_kg_px: PathBuf,
    pub depth_m: PathBuf,
}

/// Runoff-sensitivity (CRUS) job settings.
#[derive(Debug, Deserialize)]
pub struct RunoffJob {
    pub inputs: RunoffInputs,
    /// Slope class -> score, integer `key=value` table.
    pub reclass_table: PathBuf,
    /// Crusting code -> multiplier, integer `key=value` table.
    pub battance_table: PathBuf,
    /// Land-cover scenarios evaluated against the same slope,
    /// permeability and crusting layers.
    pub scenarios: Vec<Scenario>,
    /// Directory receiving the five output rasters per scenario.
    pub output_dir: PathBuf,
}

/// Input raster paths shared by every scenario of a runoff job.
#[derive(Debug, Deserialize)]
pub struct RunoffInputs {
    /// Slope-class codes; the no-data reference layer.
    pub slope: PathBuf,
    pub permeability: PathBuf,
    pub battance: PathBuf,
}

/// One land-cover scenario.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Suffix used in output file names.
    pub name: String,
    pub land_cover: PathBuf,
}

impl RunConfig {
    /// Load and validate a configuration file.
    ///
    /// The chunk limit can be overridden with the `CHUNK_LIMIT` environment
    /// variable.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let mut config: RunConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("invalid YAML in {}", path.display()))?;

        if let Ok(value) = std::env::var("CHUNK_LIMIT") {
            if let Ok(limit) = value.parse() {
                config.chunk_limit = limit;
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_limit == 0 {
            bail!("chunk_limit must be > 0");
        }

        if let JobConfig::Runoff(job) = &self.job {
            if job.scenarios.is_empty() {
                bail!("runoff job needs at least one land-cover scenario");
            }
            let mut names: Vec<&str> = job.scenarios.iter().map(|s| s.name.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            if names.len() != job.scenarios.len() {
                bail!("scenario names must be unique");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("run.yaml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_soil_loss_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
chunk_limit: 500000
job:
  kind: soil-loss
  inputs:
    erosivity: R.tif
    slope: slope_deg.tif
    clay: clay.tif
    silt: silt.tif
    sand: sand.tif
    land_cover: land_cover.tif
  cover_table: cover_coefficients.txt
  ls_mode: legacy
  outputs:
    loss_t_ha: out/loss_t_ha.tif
    loss_kg_px: out/loss_kg_px.tif
    depth_m: out/depth_m.tif
"#,
        );

        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.chunk_limit, 500000);
        assert_eq!(config.fallthrough, Fallthrough::RetainDefault);

        match config.job {
            JobConfig::SoilLoss(job) => {
                assert_eq!(job.ls_mode, LsMode::Legacy);
                assert_eq!(job.bulk_density, 1250.0);
                assert_eq!(job.inputs.slope, PathBuf::from("slope_deg.tif"));
            }
            _ => panic!("expected soil-loss job"),
        }
    }

    #[test]
    fn test_runoff_config_with_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
fallthrough: fail
job:
  kind: runoff
  inputs:
    slope: slope_classes.tif
    permeability: permeability.tif
    battance: battance.tif
  reclass_table: slope_reclass.txt
  battance_table: battance_codes.txt
  scenarios:
    - name: baseline
      land_cover: land_cover_2021.tif
    - name: projected
      land_cover: land_cover_proj.tif
  output_dir: outputs
"#,
        );

        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.chunk_limit, pixel_eval::DEFAULT_CHUNK_LIMIT);
        assert_eq!(config.fallthrough, Fallthrough::Fail);

        match config.job {
            JobConfig::Runoff(job) => {
                assert_eq!(job.scenarios.len(), 2);
                assert_eq!(job.scenarios[0].name, "baseline");
            }
            _ => panic!("expected runoff job"),
        }
    }

    #[test]
    fn test_runoff_without_scenarios_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
job:
  kind: runoff
  inputs:
    slope: s.tif
    permeability: p.tif
    battance: b.tif
  reclass_table: r.txt
  battance_table: c.txt
  scenarios: []
  output_dir: outputs
"#,
        );

        assert!(RunConfig::load(&path).is_err());
    }

    #[test]
    fn test_duplicate_scenario_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
job:
  kind: runoff
  inputs:
    slope: s.tif
    permeability: p.tif
    battance: b.tif
  reclass_table: r.txt
  battance_table: c.txt
  scenarios:
    - name: same
      land_cover: a.tif
    - name: same
      land_cover: b.tif
  output_dir: outputs
"#,
        );

        assert!(RunConfig::load(&path).is_err());
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "job: [unclosed");
        assert!(RunConfig::load(&path).is_err());
    }
}
