use crate::core::models::sensor::SensorSet;

/// Inertia before the first accepted step. Unused until momentum is active.
pub const INITIAL_INERTIA: f64 = 0.4;

/// Mutable bookkeeping of the descent, owned by a single `StepController`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerState {
    /// Current step size `s`.
    pub step_size: f64,
    /// Blend weight `α` of the newest raw step against the trajectory.
    pub inertia: f64,
    /// Iteration counter `k`, starting at 1.
    pub iteration: usize,
    /// Raw (unblended) position of the last accepted step; `None` until
    /// momentum is active or after a restart.
    pub trajectory: Option<SensorSet>,
}

impl OptimizerState {
    pub fn new(initial_step: f64) -> Self {
        Self {
            step_size: initial_step,
            inertia: INITIAL_INERTIA,
            iteration: 1,
            trajectory: None,
        }
    }

    /// `α = 1 - 3 / (5 + k)`.
    #[inline]
    pub fn inertia_for(iteration: usize) -> f64 {
        1.0 - 3.0 / (5.0 + iteration as f64)
    }

    #[inline]
    pub fn has_momentum(&self) -> bool {
        self.trajectory.is_some()
    }
}
