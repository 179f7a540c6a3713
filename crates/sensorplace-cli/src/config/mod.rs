//! Layered configuration for the CLI: built-in defaults, an optional TOML
//! file, `-S key=value` overrides and finally dedicated command-line flags.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::build_config;
pub use models::AppConfig;
