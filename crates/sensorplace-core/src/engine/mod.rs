//! # Engine Module
//!
//! The stateful side of sensor placement: everything that changes between two
//! descent iterations lives here.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Domain, objective, descent and convergence parameters
//! - **Initialization** ([`initializer`]) - Seeded random starting layouts
//! - **Descent** ([`stepper`]) - The backtracking momentum stepper and its [`state`]
//! - **Stopping** ([`convergence`]) - Relative-decrease criterion and iteration cap
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod convergence;
pub mod error;
pub mod initializer;
pub mod progress;
pub mod state;
pub mod stepper;
