//! Job execution: table load, raster read, alignment, chunked evaluation
//! and output writing, with phase timing logged throughout.

use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use erosion_formulas::{
    CorrespondenceTable, Fallthrough, RunoffContext, RunoffFormula, RunoffParams, SoilLossContext,
    SoilLossFormula, SoilLossParams,
};
use grid_align::align_rasters;
use raster_core::Raster;
use raster_io::{read_raster, write_raster, OutputType};
use tracing::info;

use crate::config::{JobConfig, RunConfig, RunoffJob, SoilLossJob};

/// Run the configured job.
pub async fn run(config: RunConfig) -> Result<()> {
    match config.job {
        JobConfig::SoilLoss(job) => run_soil_loss(job, config.chunk_limit, config.fallthrough).await,
        JobConfig::Runoff(job) => run_runoff(job, config.chunk_limit, config.fallthrough).await,
    }
}

fn read_layer(name: &str, path: &Path) -> Result<(String, Raster)> {
    let started = Instant::now();
    let raster =
        read_raster(path).with_context(|| format!("reading {name} raster {}", path.display()))?;
    info!(
        layer = name,
        path = %path.display(),
        width = raster.width,
        height = raster.height,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "read input raster"
    );
    Ok((name.to_string(), raster))
}

async fn run_soil_loss(job: SoilLossJob, chunk_limit: usize, fallthrough: Fallthrough) -> Result<()> {
    let run_started = Instant::now();

    // Tables are validated before any raster is opened; a malformed table
    // must abort the run with no partial outputs.
    let cover_table = CorrespondenceTable::load_float(&job.cover_table)
        .context("loading land-cover coefficient table")?;
    info!(entries = cover_table.len(), "loaded land-cover coefficient table");

    let inputs = &job.inputs;
    let layers = vec![
        read_layer("erosivity", &inputs.erosivity)?,
        read_layer("slope", &inputs.slope)?,
        read_layer("clay", &inputs.clay)?,
        read_layer("silt", &inputs.silt)?,
        read_layer("sand", &inputs.sand)?,
        read_layer("land_cover", &inputs.land_cover)?,
    ];

    let align_started = Instant::now();
    let aligned = align_rasters(layers).await?;
    info!(
        resampled = aligned.resampled,
        elapsed_ms = align_started.elapsed().as_millis() as u64,
        "alignment finished"
    );

    let [erosivity, slope, clay, silt, sand, land_cover]: [Raster; 6] = aligned
        .rasters
        .try_into()
        .map_err(|_| anyhow!("alignment did not return six layers"))?;

    let (width, height) = (slope.width, slope.height);
    let total = slope.len();

    let params = SoilLossParams {
        ls_mode: job.ls_mode,
        bulk_density: job.bulk_density,
        pixel_area_m2: job.pixel_area_m2,
        fallthrough,
        ..Default::default()
    };
    let output_nodata = f64::from(params.output_nodata);
    let formula = SoilLossFormula::new(cover_table, params, slope.nodata_f32());

    let eval_started = Instant::now();
    let [loss_t_ha, loss_kg_px, depth_m] = pixel_eval::evaluate::<3, _, _>(total, chunk_limit, |i| {
        formula.eval(
            i,
            SoilLossContext {
                erosivity: erosivity.data[i],
                slope_deg: slope.data[i],
                clay_pct: clay.data[i],
                silt_pct: silt.data[i],
                sand_pct: sand.data[i],
                land_cover: land_cover.data[i],
            },
        )
    })?;
    info!(
        pixels = total,
        elapsed_ms = eval_started.elapsed().as_millis() as u64,
        "soil-loss evaluation finished"
    );

    // The slope layer is the reference for output georeferencing.
    let georef = &slope.georef;
    let outputs = &job.outputs;
    write_raster(&outputs.loss_t_ha, &loss_t_ha, width, height, OutputType::Float32, georef, output_nodata)?;
    write_raster(&outputs.loss_kg_px, &loss_kg_px, width, height, OutputType::Float32, georef, output_nodata)?;
    write_raster(&outputs.depth_m, &depth_m, width, height, OutputType::Float32, georef, output_nodata)?;

    info!(
        elapsed_ms = run_started.elapsed().as_millis() as u64,
        "soil-loss job finished"
    );
    Ok(())
}

async fn run_runoff(job: RunoffJob, chunk_limit: usize, fallthrough: Fallthrough) -> Result<()> {
    let run_started = Instant::now();

    let reclass_table =
        CorrespondenceTable::load_int(&job.reclass_table).context("loading slope reclass table")?;
    let battance_table = CorrespondenceTable::load_int(&job.battance_table)
        .context("loading battance coefficient table")?;
    info!(
        reclass_entries = reclass_table.len(),
        battance_entries = battance_table.len(),
        "loaded correspondence tables"
    );

    // The scenario land-cover rasters join the shared layers so one
    // alignment pass co-registers everything.
    let inputs = &job.inputs;
    let mut layers = vec![
        read_layer("slope", &inputs.slope)?,
        read_layer("permeability", &inputs.permeability)?,
        read_layer("battance", &inputs.battance)?,
    ];
    for scenario in &job.scenarios {
        layers.push(read_layer(&scenario.name, &scenario.land_cover)?);
    }

    let align_started = Instant::now();
    let aligned = align_rasters(layers).await?;
    info!(
        resampled = aligned.resampled,
        elapsed_ms = align_started.elapsed().as_millis() as u64,
        "alignment finished"
    );

    let mut rasters = aligned.rasters.into_iter();
    let slope = rasters.next().ok_or_else(|| anyhow!("missing slope layer"))?;
    let permeability = rasters
        .next()
        .ok_or_else(|| anyhow!("missing permeability layer"))?;
    let battance = rasters
        .next()
        .ok_or_else(|| anyhow!("missing battance layer"))?;
    let scenario_rasters: Vec<Raster> = rasters.collect();

    let (width, height) = (slope.width, slope.height);
    let total = slope.len();

    let params = RunoffParams {
        fallthrough,
        ..Default::default()
    };
    let class_nodata = f64::from(params.class_nodata);
    let diff_nodata = f64::from(params.diff_nodata);
    let formula = RunoffFormula::new(reclass_table, battance_table, params, slope.nodata_f32());

    std::fs::create_dir_all(&job.output_dir)
        .with_context(|| format!("creating output directory {}", job.output_dir.display()))?;

    // The permeability layer is the reference for output georeferencing.
    let georef = &permeability.georef;

    for (scenario, land_cover) in job.scenarios.iter().zip(&scenario_rasters) {
        let eval_started = Instant::now();
        let [crust_slope, crust_flat, bare_slope, bare_flat, diff] =
            pixel_eval::evaluate::<5, _, _>(total, chunk_limit, |i| {
                formula.eval(
                    i,
                    RunoffContext {
                        slope_class: slope.data[i],
                        permeability: permeability.data[i],
                        land_cover: land_cover.data[i],
                        battance: battance.data[i],
                    },
                )
            })?;
        info!(
            scenario = %scenario.name,
            pixels = total,
            elapsed_ms = eval_started.elapsed().as_millis() as u64,
            "runoff evaluation finished"
        );

        let out = |stem: &str| job.output_dir.join(format!("{stem}_{}.tif", scenario.name));
        write_raster(out("runoff_crust_slope"), &crust_slope, width, height, OutputType::Int16, georef, class_nodata)?;
        write_raster(out("runoff_crust_flat"), &crust_flat, width, height, OutputType::Int16, georef, class_nodata)?;
        write_raster(out("runoff_bare_slope"), &bare_slope, width, height, OutputType::Int16, georef, class_nodata)?;
        write_raster(out("runoff_bare_flat"), &bare_flat, width, height, OutputType::Int16, georef, class_nodata)?;
        write_raster(out("runoff_diff"), &diff, width, height, OutputType::Int16, georef, diff_nodata)?;
    }

    info!(
        scenarios = job.scenarios.len(),
        elapsed_ms = run_started.elapsed().as_millis() as u64,
        "runoff job finished"
    );
    Ok(())
}
