use sensorplace::core::io::sensors::CoordinateFormat;
use sensorplace::engine::config as core_config;
use std::path::PathBuf;

/// Values used when neither the command line nor the config file sets a parameter.
pub struct DefaultsConfig {
    pub nx: usize,
    pub ny: usize,
    pub fraction: f64,
    /// `None` lets the core resolve `W = N`.
    pub repulsion_weight: Option<f64>,
    pub initial_step: f64,
    pub max_backtracks: usize,
    pub restart_on_stall: bool,
    pub relative_tolerance: f64,
    pub max_iterations: usize,
    pub require_convergence: bool,
    pub output_dir: PathBuf,
    pub format: CoordinateFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            nx: 127,
            ny: 97,
            fraction: 0.01,
            repulsion_weight: None,
            initial_step: core_config::DEFAULT_INITIAL_STEP,
            max_backtracks: core_config::DEFAULT_MAX_BACKTRACKS,
            restart_on_stall: true,
            relative_tolerance: f64::EPSILON,
            max_iterations: core_config::DEFAULT_MAX_ITERATIONS,
            require_convergence: false,
            output_dir: PathBuf::from("."),
            format: CoordinateFormat::Pixel,
        }
    }
}
