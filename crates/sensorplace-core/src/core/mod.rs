//! # Core Module
//!
//! Stateless building blocks of the sensor-placement optimizer.
//!
//! ## Architecture
//!
//! - **Layout Representation** ([`models`]) - The observation grid and the sensor points placed on it
//! - **Energy Calculations** ([`objective`]) - The spreading energy `J` and its gradient
//! - **File I/O** ([`io`]) - Sensor-location files consumed by downstream assimilation tools
//!
//! Nothing in this layer holds optimizer state; every function is a pure
//! transformation of its inputs.

pub mod io;
pub mod models;
pub mod objective;
