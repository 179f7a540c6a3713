use sensorplace::core::io::sensors::CoordinateFormat;
use sensorplace::engine::config as core_config;
use std::path::PathBuf;

/// Fully resolved settings of one `place` invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub format: CoordinateFormat,
    pub core_config: core_config::PlacementConfig,
}
