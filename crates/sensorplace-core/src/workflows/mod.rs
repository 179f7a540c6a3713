//! # Workflows Module
//!
//! End-to-end entry points that turn a [`crate::engine::config::PlacementConfig`]
//! into an optimized sensor layout.
//!
//! - **Placement Workflow** ([`place`]) - Seeded initialization followed by
//!   backtracking gradient descent until the energy settles.

pub mod place;
