use sensorplace::core::io::sensors::SensorFileError;
use sensorplace::core::models::domain::DomainError;
use sensorplace::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid domain: {0}")]
    Domain(#[from] DomainError),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write sensor file '{path}': {source}", path = path.display())]
    SensorOutput {
        path: PathBuf,
        #[source]
        source: SensorFileError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
