use crate::core::models::domain::{Domain, DomainError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

pub const DEFAULT_INITIAL_STEP: f64 = 0.1;
pub const DEFAULT_MAX_BACKTRACKS: usize = 64;
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainConfig {
    pub nx: usize,
    pub ny: usize,
    pub fraction: f64,
}

impl DomainConfig {
    pub fn domain(&self) -> Result<Domain, DomainError> {
        Domain::new(self.nx, self.ny)
    }

    pub fn sensor_count(&self) -> Result<usize, DomainError> {
        self.domain()?.sensor_count(self.fraction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObjectiveConfig {
    /// Total pair-repulsion weight `W`; each pair is weighted by `W / N`.
    /// `None` resolves to `W = N`, a unit weight on every pair.
    pub repulsion_weight: Option<f64>,
}

impl ObjectiveConfig {
    /// The weight `W` to use for a layout of `sensor_count` sensors.
    pub fn weight_for(&self, sensor_count: usize) -> f64 {
        self.repulsion_weight.unwrap_or(sensor_count as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentConfig {
    pub initial_step: f64,
    /// Rejected trials allowed inside a single step before it reports a stall.
    pub max_backtracks: usize,
    /// Drop the momentum trajectory and reset the step size when a step stalls.
    pub restart_on_stall: bool,
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self {
            initial_step: DEFAULT_INITIAL_STEP,
            max_backtracks: DEFAULT_MAX_BACKTRACKS,
            restart_on_stall: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceConfig {
    /// Iteration continues while `J_prev - J_new > relative_tolerance * J_prev`.
    pub relative_tolerance: f64,
    pub max_iterations: usize,
    /// Report hitting `max_iterations` as an error instead of a result.
    pub require_convergence: bool,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            relative_tolerance: f64::EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            require_convergence: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    pub domain: DomainConfig,
    pub objective: ObjectiveConfig,
    pub descent: DescentConfig,
    pub convergence: ConvergenceConfig,
    pub seed: Option<u64>,
}

#[derive(Default)]
pub struct PlacementConfigBuilder {
    nx: Option<usize>,
    ny: Option<usize>,
    fraction: Option<f64>,
    repulsion_weight: Option<f64>,
    initial_step: Option<f64>,
    max_backtracks: Option<usize>,
    restart_on_stall: Option<bool>,
    relative_tolerance: Option<f64>,
    max_iterations: Option<usize>,
    require_convergence: Option<bool>,
    seed: Option<u64>,
}

impl PlacementConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nx(mut self, nx: usize) -> Self {
        self.nx = Some(nx);
        self
    }
    pub fn ny(mut self, ny: usize) -> Self {
        self.ny = Some(ny);
        self
    }
    pub fn fraction(mut self, fraction: f64) -> Self {
        self.fraction = Some(fraction);
        self
    }
    pub fn repulsion_weight(mut self, weight: f64) -> Self {
        self.repulsion_weight = Some(weight);
        self
    }
    pub fn initial_step(mut self, step: f64) -> Self {
        self.initial_step = Some(step);
        self
    }
    pub fn max_backtracks(mut self, backtracks: usize) -> Self {
        self.max_backtracks = Some(backtracks);
        self
    }
    pub fn restart_on_stall(mut self, restart: bool) -> Self {
        self.restart_on_stall = Some(restart);
        self
    }
    pub fn relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = Some(tolerance);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn require_convergence(mut self, require: bool) -> Self {
        self.require_convergence = Some(require);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<PlacementConfig, ConfigError> {
        let domain = DomainConfig {
            nx: self.nx.ok_or(ConfigError::MissingParameter("nx"))?,
            ny: self.ny.ok_or(ConfigError::MissingParameter("ny"))?,
            fraction: self
                .fraction
                .ok_or(ConfigError::MissingParameter("fraction"))?,
        };
        let objective = ObjectiveConfig {
            repulsion_weight: self.repulsion_weight,
        };
        let descent = DescentConfig {
            initial_step: self.initial_step.unwrap_or(DEFAULT_INITIAL_STEP),
            max_backtracks: self.max_backtracks.unwrap_or(DEFAULT_MAX_BACKTRACKS),
            restart_on_stall: self.restart_on_stall.unwrap_or(true),
        };
        let convergence = ConvergenceConfig {
            relative_tolerance: self.relative_tolerance.unwrap_or(f64::EPSILON),
            max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            require_convergence: self.require_convergence.unwrap_or(false),
        };

        let config = PlacementConfig {
            domain,
            objective,
            descent,
            convergence,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

impl PlacementConfig {
    /// Checks every numeric parameter against its admissible range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.nx == 0 {
            return Err(invalid("nx", "must be at least 1"));
        }
        if self.domain.ny == 0 {
            return Err(invalid("ny", "must be at least 1"));
        }
        if self.domain.nx.checked_mul(self.domain.ny).is_none() {
            return Err(invalid("nx", "nx * ny overflows the cell count"));
        }
        let fraction = self.domain.fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(invalid(
                "fraction",
                format!("must lie in (0, 1], got {fraction}"),
            ));
        }

        if let Some(weight) = self.objective.repulsion_weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(
                    "repulsion_weight",
                    format!("must be finite and non-negative, got {weight}"),
                ));
            }
        }

        let step = self.descent.initial_step;
        if !step.is_finite() || step <= 0.0 {
            return Err(invalid(
                "initial_step",
                format!("must be finite and positive, got {step}"),
            ));
        }
        if self.descent.max_backtracks == 0 {
            return Err(invalid("max_backtracks", "must be at least 1"));
        }

        let tolerance = self.convergence.relative_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(invalid(
                "relative_tolerance",
                format!("must be finite and non-negative, got {tolerance}"),
            ));
        }
        if self.convergence.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}
