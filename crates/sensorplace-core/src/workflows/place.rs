use crate::core::models::domain::Domain;
use crate::core::models::sensor::SensorSet;
use crate::core::objective::evaluator::ObjectiveEvaluator;
use crate::core::objective::term::EnergyTerm;
use crate::engine::config::PlacementConfig;
use crate::engine::convergence::{ConvergenceMonitor, Verdict};
use crate::engine::error::EngineError;
use crate::engine::initializer::Initializer;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::stepper::StepController;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The relative decrease of `J` fell to machine precision.
    Converged,
    /// No trial step was accepted, even after dropping momentum.
    Stationary,
    IterationLimit,
}

#[derive(Debug, Clone)]
pub struct PlacementResult {
    pub domain: Domain,
    /// Seed of the initial layout; `None` when the caller supplied the layout.
    pub seed: Option<u64>,
    pub initial: SensorSet,
    pub sensors: SensorSet,
    /// The weight `W` the layout was optimized with.
    pub repulsion_weight: f64,
    pub initial_energy: EnergyTerm,
    pub energy: EnergyTerm,
    /// Accepted objective values in order, starting with the initial layout.
    pub energy_trace: Vec<f64>,
    pub iterations: usize,
    pub momentum_restarts: usize,
    pub stop_reason: StopReason,
}

impl PlacementResult {
    pub fn converged(&self) -> bool {
        self.stop_reason != StopReason::IterationLimit
    }
}

/// Scatters a seeded random layout over the configured domain and optimizes it.
///
/// Without a configured seed a fresh one is drawn; it is logged and returned in
/// the result so the run can be reproduced.
#[instrument(skip_all, name = "placement_workflow")]
pub fn run(
    config: &PlacementConfig,
    reporter: &ProgressReporter,
) -> Result<PlacementResult, EngineError> {
    config.validate()?;

    // === Phase 1: Initial layout ===
    reporter.report(Progress::PhaseStart {
        name: "Initialization",
    });
    let domain = config.domain.domain()?;
    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!(seed, "No seed configured; drew a fresh one.");
            seed
        }
    };
    let initial = Initializer::from_seed(seed).initialize(&domain, config.domain.fraction)?;
    info!(
        nx = domain.nx(),
        ny = domain.ny(),
        sensors = initial.len(),
        seed,
        "Initial layout scattered."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Descent ===
    descend(initial, domain, Some(seed), config, reporter)
}

/// Optimizes a caller-supplied initial layout. The sensor count is taken from
/// `initial`; the configured fraction is ignored.
#[instrument(skip_all, name = "placement_workflow", fields(sensors = initial.len()))]
pub fn optimize(
    initial: SensorSet,
    config: &PlacementConfig,
    reporter: &ProgressReporter,
) -> Result<PlacementResult, EngineError> {
    config.validate()?;
    let domain = config.domain.domain()?;
    if !initial.is_empty() && !initial.is_within_unit_square() {
        return Err(EngineError::Initialization(
            "initial layout must lie inside the unit square".to_string(),
        ));
    }
    descend(initial, domain, None, config, reporter)
}

fn descend(
    initial: SensorSet,
    domain: Domain,
    seed: Option<u64>,
    config: &PlacementConfig,
    reporter: &ProgressReporter,
) -> Result<PlacementResult, EngineError> {
    reporter.report(Progress::PhaseStart { name: "Descent" });

    let repulsion_weight = config.objective.weight_for(initial.len());
    let evaluator = ObjectiveEvaluator::new(repulsion_weight);
    let mut controller = StepController::new(initial.clone(), evaluator, &config.descent)?;
    let initial_energy = controller.energy();
    let mut monitor = ConvergenceMonitor::new(&config.convergence, controller.objective());
    let mut momentum_restarts = 0;

    info!(
        sensors = initial.len(),
        weight = repulsion_weight,
        objective = initial_energy.total(),
        "Starting gradient descent."
    );
    reporter.report(Progress::TaskStart {
        total_steps: config.convergence.max_iterations as u64,
    });

    let stop_reason = loop {
        let outcome = controller.step()?;

        if !outcome.accepted {
            if controller.has_momentum() && config.descent.restart_on_stall {
                momentum_restarts += 1;
                debug!(
                    iteration = controller.state().iteration,
                    rejected = outcome.rejected_trials,
                    "Step stalled; restarting momentum."
                );
                controller.restart_momentum();
                continue;
            }
            break StopReason::Stationary;
        }

        reporter.report(Progress::TaskIncrement);
        reporter.report(Progress::StatusUpdate {
            text: format!("J = {:.9e}", outcome.objective),
        });
        debug!(
            iteration = monitor.iterations() + 1,
            objective = outcome.objective,
            rejected = outcome.rejected_trials,
            step_size = controller.state().step_size,
            "Accepted step."
        );

        match monitor.observe(outcome.previous, outcome.objective) {
            Verdict::Continue => {}
            Verdict::Converged => break StopReason::Converged,
            Verdict::IterationLimit => break StopReason::IterationLimit,
        }
    };

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let iterations = monitor.iterations();
    if stop_reason == StopReason::IterationLimit {
        warn!(
            iterations,
            "Iteration limit reached before the objective settled."
        );
        if config.convergence.require_convergence {
            return Err(EngineError::Convergence { iterations });
        }
    }

    let energy = controller.energy();
    info!(
        iterations,
        momentum_restarts,
        objective = energy.total(),
        reason = ?stop_reason,
        "Workflow complete."
    );

    Ok(PlacementResult {
        domain,
        seed,
        initial,
        sensors: controller.into_sensors(),
        repulsion_weight,
        initial_energy,
        energy,
        energy_trace: monitor.into_trace(),
        iterations,
        momentum_restarts,
        stop_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::PlacementConfigBuilder;
    use nalgebra::Point2;
    use std::sync::Mutex;

    fn set(points: &[(f64, f64)]) -> SensorSet {
        points.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn config(weight: f64) -> PlacementConfig {
        PlacementConfigBuilder::new()
            .nx(32)
            .ny(32)
            .fraction(0.01)
            .repulsion_weight(weight)
            .build()
            .unwrap()
    }

    fn assert_monotone(trace: &[f64]) {
        for pair in trace.windows(2) {
            assert!(pair[1] <= pair[0], "energy rose from {} to {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn single_sensor_settles_at_domain_center() {
        let result =
            optimize(set(&[(0.2, 0.7)]), &config(0.0), &ProgressReporter::new()).unwrap();
        let p = result.sensors.points()[0];
        assert!((p.x - 0.5).abs() < 1e-3, "x = {}", p.x);
        assert!((p.y - 0.5).abs() < 1e-3, "y = {}", p.y);
        assert!(result.converged());
        assert!(result.energy.total() < result.initial_energy.total());
    }

    fn assert_mirrored_about_center(result: &PlacementResult) {
        let p = result.sensors.points();
        let midpoint = result.sensors.centroid().unwrap();
        assert!((midpoint.x - 0.5).abs() < 1e-3, "centroid x = {}", midpoint.x);
        assert!((midpoint.y - 0.5).abs() < 1e-3, "centroid y = {}", midpoint.y);
        for axis in 0..2 {
            let (a, b) = (p[0][axis], p[1][axis]);
            assert!((a + b - 1.0).abs() < 2e-3, "axis {axis}: {a} and {b} are not mirrored");
            assert!((a - 0.5) * (b - 0.5) < 0.0, "axis {axis}: both sensors on one side");
        }
        assert!(result.sensors.min_pairwise_distance().unwrap() > 0.25);
    }

    #[test]
    fn two_sensors_separate_symmetrically() {
        let result = optimize(
            set(&[(0.4, 0.45), (0.6, 0.55)]),
            &config(1.0),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_mirrored_about_center(&result);
    }

    #[test]
    fn two_sensors_from_an_asymmetric_start_settle_mirrored() {
        let default_weight = PlacementConfigBuilder::new()
            .nx(32)
            .ny(32)
            .fraction(0.01)
            .build()
            .unwrap();
        let starts = [
            [(0.3, 0.2), (0.45, 0.62)],
            [(0.1, 0.9), (0.2, 0.85)],
            [(0.7, 0.3), (0.71, 0.33)],
        ];
        for start in starts {
            for cfg in [config(1.0), default_weight.clone()] {
                let result = optimize(set(&start), &cfg, &ProgressReporter::new()).unwrap();
                assert_eq!(result.stop_reason, StopReason::Converged);
                assert_mirrored_about_center(&result);
                assert_monotone(&result.energy_trace);
            }
        }
    }

    #[test]
    fn default_weight_spreads_sensors_across_the_domain() {
        let config = PlacementConfigBuilder::new()
            .nx(127)
            .ny(97)
            .fraction(0.01)
            .seed(7)
            .build()
            .unwrap();
        let result = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(result.repulsion_weight, 124.0);

        let (mut lo, mut hi): (Point2<f64>, Point2<f64>) = (Point2::new(1.0, 1.0), Point2::new(0.0, 0.0));
        for p in result.sensors.iter() {
            lo = Point2::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Point2::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        assert!(lo.x < 0.1 && lo.y < 0.1, "lowest corner {lo}");
        assert!(hi.x > 0.9 && hi.y > 0.9, "highest corner {hi}");
        assert!(result.sensors.min_pairwise_distance().unwrap() > 0.05);
    }

    #[test]
    fn seeded_runs_are_reproducible_and_stay_in_bounds() {
        let config = PlacementConfigBuilder::new()
            .nx(20)
            .ny(15)
            .fraction(0.05)
            .seed(2024)
            .build()
            .unwrap();
        let first = run(&config, &ProgressReporter::new()).unwrap();
        let second = run(&config, &ProgressReporter::new()).unwrap();

        assert_eq!(first.seed, Some(2024));
        assert_eq!(first.sensors.len(), 15);
        assert_eq!(first.sensors, second.sensors);
        assert!(first.sensors.is_within_unit_square());
        assert_eq!(first.energy_trace.len(), first.iterations + 1);
        assert_monotone(&first.energy_trace);
    }

    #[test]
    fn random_layouts_never_increase_energy() {
        for seed in [1, 2, 3] {
            let config = PlacementConfigBuilder::new()
                .nx(10)
                .ny(10)
                .fraction(0.08)
                .seed(seed)
                .build()
                .unwrap();
            let result = run(&config, &ProgressReporter::new()).unwrap();
            assert!(result.sensors.is_within_unit_square());
            assert_monotone(&result.energy_trace);
            assert_eq!(result.energy_trace.last(), Some(&result.energy.total()));
        }
    }

    #[test]
    fn unseeded_run_reports_the_seed_it_drew() {
        let config = PlacementConfigBuilder::new()
            .nx(4)
            .ny(4)
            .fraction(0.1)
            .max_iterations(3)
            .build()
            .unwrap();
        let result = run(&config, &ProgressReporter::new()).unwrap();
        assert!(result.seed.is_some());
        assert_eq!(result.sensors.len(), 2);
    }

    #[test]
    fn iteration_cap_stops_the_descent() {
        let config = PlacementConfigBuilder::new()
            .nx(16)
            .ny(16)
            .fraction(0.05)
            .seed(5)
            .max_iterations(1)
            .build()
            .unwrap();
        let result = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(result.stop_reason, StopReason::IterationLimit);
        assert_eq!(result.iterations, 1);
        assert!(!result.converged());
    }

    #[test]
    fn strict_mode_reports_iteration_cap_as_error() {
        let config = PlacementConfigBuilder::new()
            .nx(16)
            .ny(16)
            .fraction(0.05)
            .seed(5)
            .max_iterations(1)
            .require_convergence(true)
            .build()
            .unwrap();
        let result = run(&config, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::Convergence { iterations: 1 })
        ));
    }

    #[test]
    fn reference_density_produces_124_sensors() {
        let config = PlacementConfigBuilder::new()
            .nx(127)
            .ny(97)
            .fraction(0.01)
            .seed(0)
            .max_iterations(5)
            .build()
            .unwrap();
        let result = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(result.sensors.len(), 124);
        assert_eq!(result.initial.len(), 124);
        assert!(result.sensors.is_within_unit_square());
    }

    #[test]
    fn descent_without_restarts_still_terminates_in_bounds() {
        let config = PlacementConfigBuilder::new()
            .nx(32)
            .ny(32)
            .fraction(0.01)
            .repulsion_weight(0.0)
            .restart_on_stall(false)
            .build()
            .unwrap();
        let result = optimize(set(&[(0.9, 0.15)]), &config, &ProgressReporter::new()).unwrap();
        assert_eq!(result.momentum_restarts, 0);
        assert!(result.sensors.is_within_unit_square());
        assert_monotone(&result.energy_trace);
    }

    #[test]
    fn optimize_rejects_invalid_initial_layouts() {
        let reporter = ProgressReporter::new();
        assert!(matches!(
            optimize(SensorSet::default(), &config(1.0), &reporter),
            Err(EngineError::EmptySensorSet)
        ));
        assert!(matches!(
            optimize(set(&[(1.2, 0.5)]), &config(1.0), &reporter),
            Err(EngineError::Initialization(_))
        ));
    }

    #[test]
    fn progress_reports_one_increment_per_accepted_step() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
            events.lock().unwrap().push(event);
        }));
        let config = PlacementConfigBuilder::new()
            .nx(8)
            .ny(8)
            .fraction(0.05)
            .seed(9)
            .build()
            .unwrap();
        let result = run(&config, &reporter).unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        let phases: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                Progress::PhaseStart { name } => Some(*name),
                _ => None,
            })
            .collect();
        let increments = events
            .iter()
            .filter(|e| matches!(e, Progress::TaskIncrement))
            .count();

        assert_eq!(phases, vec!["Initialization", "Descent"]);
        assert_eq!(increments, result.iterations);
    }
}
