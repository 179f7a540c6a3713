use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::domain::DomainError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid domain: {source}")]
    Domain {
        #[from]
        source: DomainError,
    },

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Cannot optimize an empty sensor set")]
    EmptySensorSet,

    #[error("Non-finite {what} encountered at iteration {iteration}")]
    NonFinite { iteration: usize, what: &'static str },

    #[error("Algorithm failed to converge after {iterations} iterations")]
    Convergence { iterations: usize },
}
