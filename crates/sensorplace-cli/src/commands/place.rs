use crate::cli::PlaceArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use sensorplace::core::io::sensors::SensorFile;
use sensorplace::core::objective::evaluator::self_pair_offset;
use sensorplace::engine::progress::ProgressReporter;
use sensorplace::workflows::{self, place::PlacementResult};
use std::path::PathBuf;
use tracing::{info, warn};

pub fn run(args: PlaceArgs) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app = build_config(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let (result, output_path) = execute(&app, &reporter)?;

    if !result.converged() {
        warn!("Descent stopped at the iteration limit; the layout may not be settled.");
        println!(
            "Warning: iteration limit of {} reached before the energy settled.",
            result.iterations
        );
    }
    println!("{}", summarize(&result));
    println!("✓ Sensor layout written to: {}", output_path.display());
    Ok(())
}

/// Runs the placement workflow and writes the layout into the output directory.
pub fn execute(
    app: &AppConfig,
    reporter: &ProgressReporter,
) -> Result<(PlacementResult, PathBuf)> {
    info!("Invoking the core placement workflow...");
    let result = workflows::place::run(&app.core_config, reporter)?;

    std::fs::create_dir_all(&app.output_dir)?;
    let output_path = app.output_dir.join(SensorFile::file_name(&result.domain));
    info!(
        "Writing {} sensor(s) in {} format to {:?}",
        result.sensors.len(),
        app.format,
        &output_path
    );
    SensorFile::write_to_path(&result.sensors, &result.domain, app.format, &output_path)
        .map_err(|source| CliError::SensorOutput {
            path: output_path.clone(),
            source,
        })?;

    Ok((result, output_path))
}

fn summarize(result: &PlacementResult) -> String {
    let seed = result
        .seed
        .map_or_else(|| "n/a".to_string(), |s| s.to_string());
    let spacing = result
        .sensors
        .min_pairwise_distance()
        .map_or_else(|| "n/a".to_string(), |d| format!("{:.6}", d));

    format!(
        "Placed {} sensor(s) on a {}x{} grid.\n  \
           Seed:                 {}\n  \
           Pair weight W:        {}\n  \
           Iterations:           {} ({} momentum restart(s), stopped: {:?})\n  \
           Energy:               {:.9e} -> {:.9e}\n  \
           Boundary part:        {:.9e}\n  \
           Mutual part:          {:.9e} (excluding self pairs: {:.9e})\n  \
           Closest sensor pair:  {}",
        result.sensors.len(),
        result.domain.nx(),
        result.domain.ny(),
        seed,
        result.repulsion_weight,
        result.iterations,
        result.momentum_restarts,
        result.stop_reason,
        result.initial_energy.total(),
        result.energy.total(),
        result.energy.boundary,
        result.energy.mutual,
        result.energy.mutual - self_pair_offset(result.repulsion_weight),
        spacing,
    )
}
