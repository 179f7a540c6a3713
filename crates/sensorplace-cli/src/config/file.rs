use crate::error::{CliError, Result};
use sensorplace::core::io::sensors::CoordinateFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDomainConfig {
    pub nx: Option<usize>,
    pub ny: Option<usize>,
    pub fraction: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileObjectiveConfig {
    pub repulsion_weight: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDescentConfig {
    pub initial_step: Option<f64>,
    pub max_backtracks: Option<usize>,
    pub restart_on_stall: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConvergenceConfig {
    pub relative_tolerance: Option<f64>,
    pub max_iterations: Option<usize>,
    pub require_convergence: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub directory: Option<PathBuf>,
    pub format: Option<CoordinateFormat>,
}

/// The TOML configuration file. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub seed: Option<u64>,
    pub domain: Option<FileDomainConfig>,
    pub objective: Option<FileObjectiveConfig>,
    pub descent: Option<FileDescentConfig>,
    pub convergence: Option<FileConvergenceConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
