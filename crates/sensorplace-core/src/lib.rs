//! # sensorplace
//!
//! Spreads point sensors over a rectangular observation grid by minimizing a
//! repulsion energy: sensors push each other apart and are pushed away from
//! the four domain walls.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Domain`, `SensorSet`),
//!   the pure energy functional (`ObjectiveEvaluator`) and sensor-file I/O.
//!
//! - **[`engine`]: The Logic Core.** The stateful optimizer: seeded initialization,
//!   the backtracking momentum stepper (`StepController`), the stopping criterion
//!   (`ConvergenceMonitor`), configuration and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a
//!   single call that turns a configuration into an optimized sensor layout.
//!
//! ```no_run
//! use sensorplace::engine::config::PlacementConfigBuilder;
//! use sensorplace::engine::progress::ProgressReporter;
//! use sensorplace::workflows::place;
//!
//! let config = PlacementConfigBuilder::new()
//!     .nx(127)
//!     .ny(97)
//!     .fraction(0.01)
//!     .seed(7)
//!     .build()?;
//! let result = place::run(&config, &ProgressReporter::new())?;
//! println!("{} sensors, J = {}", result.sensors.len(), result.energy.total());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
