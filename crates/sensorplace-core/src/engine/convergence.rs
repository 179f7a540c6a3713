use super::config::ConvergenceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    /// The last accepted step no longer decreased `J` by more than the relative tolerance.
    Converged,
    IterationLimit,
}

/// Stopping criterion for the descent loop, fed once per accepted step.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    relative_tolerance: f64,
    max_iterations: usize,
    iterations: usize,
    trace: Vec<f64>,
}

impl ConvergenceMonitor {
    pub fn new(config: &ConvergenceConfig, initial_objective: f64) -> Self {
        Self {
            relative_tolerance: config.relative_tolerance,
            max_iterations: config.max_iterations,
            iterations: 0,
            trace: vec![initial_objective],
        }
    }

    /// `true` while `previous - current > tolerance * previous`.
    #[inline]
    pub fn is_decreasing(previous: f64, current: f64, relative_tolerance: f64) -> bool {
        previous - current > relative_tolerance * previous
    }

    pub fn observe(&mut self, previous: f64, current: f64) -> Verdict {
        self.iterations += 1;
        self.trace.push(current);

        if !Self::is_decreasing(previous, current, self.relative_tolerance) {
            Verdict::Converged
        } else if self.iterations >= self.max_iterations {
            Verdict::IterationLimit
        } else {
            Verdict::Continue
        }
    }

    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Every accepted objective value, starting with the initial one.
    pub fn trace(&self) -> &[f64] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<f64> {
        self.trace
    }
}
