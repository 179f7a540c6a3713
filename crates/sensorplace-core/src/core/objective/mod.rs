//! # Objective Module
//!
//! The sensor-spreading energy functional and its analytic gradient.
//!
//! Each sensor is repelled by the four walls of the unit square through
//! `1 / (d² + ε)` terms and by every sensor of the layout through a weighted
//! `1 / (‖pᵢ − pⱼ‖² + ε)` pair term. The regularization `ε` keeps every term
//! finite, including for coincident sensors and sensors on a wall.
//!
//! - [`potentials`] - Scalar wall and pair potentials
//! - [`term`] - Energy aggregation split into boundary and mutual parts
//! - [`evaluator`] - [`evaluator::ObjectiveEvaluator`], the O(N²) evaluation pass

pub mod evaluator;
pub mod potentials;
pub mod term;
