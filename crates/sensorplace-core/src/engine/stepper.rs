use super::config::DescentConfig;
use super::error::EngineError;
use super::state::OptimizerState;
use crate::core::models::sensor::{GradientField, SensorSet};
use crate::core::objective::evaluator::{Evaluation, ObjectiveEvaluator};
use crate::core::objective::term::EnergyTerm;
use tracing::trace;

/// Step-size factor applied after a rejected trial.
pub const SHRINK_FACTOR: f64 = 0.1;
/// Step-size factor applied after an accepted trial.
pub const GROWTH_FACTOR: f64 = 2.0;

/// Result of a single trial move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trial {
    Accepted,
    /// The candidate left the unit square.
    OutOfBounds,
    /// The candidate raised the objective.
    NoImprovement,
}

/// Result of [`StepController::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Objective after the step; equals `previous` when nothing was accepted.
    pub objective: f64,
    pub previous: f64,
    pub accepted: bool,
    pub improved: bool,
    /// Trials rejected before acceptance or before giving up.
    pub rejected_trials: usize,
}

/// Safeguarded gradient descent with momentum smoothing and backtracking.
///
/// The controller exclusively owns the current layout, its evaluation and the
/// [`OptimizerState`]. A trial move is built from the gradient of the current
/// layout, blended with the previous raw step once momentum is active, and
/// accepted only if it stays inside the unit square and does not raise the
/// objective. Rejected trials shrink the step size and leave every other piece
/// of state untouched.
#[derive(Debug, Clone)]
pub struct StepController {
    evaluator: ObjectiveEvaluator,
    sensors: SensorSet,
    evaluation: Evaluation,
    state: OptimizerState,
    initial_step: f64,
    max_backtracks: usize,
}

impl StepController {
    /// Evaluates `sensors` and prepares the controller for the first step.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptySensorSet`] for an empty layout and
    /// [`EngineError::NonFinite`] if the initial evaluation is not finite.
    pub fn new(
        sensors: SensorSet,
        evaluator: ObjectiveEvaluator,
        descent: &DescentConfig,
    ) -> Result<Self, EngineError> {
        if sensors.is_empty() {
            return Err(EngineError::EmptySensorSet);
        }
        if !sensors.is_finite() {
            return Err(EngineError::NonFinite {
                iteration: 0,
                what: "initial position",
            });
        }
        let evaluation = evaluator.evaluate(&sensors);
        if !evaluation.is_finite() {
            return Err(EngineError::NonFinite {
                iteration: 0,
                what: "initial objective",
            });
        }

        Ok(Self {
            evaluator,
            sensors,
            evaluation,
            state: OptimizerState::new(descent.initial_step),
            initial_step: descent.initial_step,
            max_backtracks: descent.max_backtracks,
        })
    }

    #[inline]
    pub fn sensors(&self) -> &SensorSet {
        &self.sensors
    }

    #[inline]
    pub fn objective(&self) -> f64 {
        self.evaluation.objective()
    }

    #[inline]
    pub fn energy(&self) -> EnergyTerm {
        self.evaluation.energy
    }

    #[inline]
    pub fn gradient(&self) -> &GradientField {
        &self.evaluation.gradient
    }

    #[inline]
    pub fn state(&self) -> &OptimizerState {
        &self.state
    }

    pub fn into_sensors(self) -> SensorSet {
        self.sensors
    }

    /// Attempts one trial move with the current step size.
    pub fn try_step(&mut self) -> Result<Trial, EngineError> {
        let raw = self
            .sensors
            .descend(&self.evaluation.gradient, self.state.step_size);
        let candidate = match &self.state.trajectory {
            Some(previous_raw) => raw.blend(previous_raw, self.state.inertia),
            None => raw.clone(),
        };

        if !candidate.is_within_unit_square() {
            self.state.step_size *= SHRINK_FACTOR;
            trace!(step_size = self.state.step_size, "Trial left the domain.");
            return Ok(Trial::OutOfBounds);
        }

        let evaluation = self.evaluator.evaluate(&candidate);
        if !evaluation.is_finite() {
            return Err(EngineError::NonFinite {
                iteration: self.state.iteration,
                what: "objective",
            });
        }
        if evaluation.objective() > self.evaluation.objective() {
            self.state.step_size *= SHRINK_FACTOR;
            trace!(
                step_size = self.state.step_size,
                candidate = evaluation.objective(),
                "Trial raised the objective."
            );
            return Ok(Trial::NoImprovement);
        }

        self.sensors = candidate;
        self.evaluation = evaluation;
        self.state.trajectory = Some(raw);
        self.state.step_size *= GROWTH_FACTOR;
        self.state.inertia = OptimizerState::inertia_for(self.state.iteration);
        self.state.iteration += 1;
        Ok(Trial::Accepted)
    }

    /// Performs one accepted iteration, backtracking as often as needed.
    ///
    /// After `max_backtracks` rejected trials the step gives up and reports
    /// `accepted == false` with the objective unchanged.
    pub fn step(&mut self) -> Result<StepOutcome, EngineError> {
        let previous = self.objective();
        let mut rejected_trials = 0;

        while rejected_trials < self.max_backtracks {
            if self.try_step()? == Trial::Accepted {
                let objective = self.objective();
                return Ok(StepOutcome {
                    objective,
                    previous,
                    accepted: true,
                    improved: objective < previous,
                    rejected_trials,
                });
            }
            rejected_trials += 1;
        }

        Ok(StepOutcome {
            objective: previous,
            previous,
            accepted: false,
            improved: false,
            rejected_trials,
        })
    }

    #[inline]
    pub fn has_momentum(&self) -> bool {
        self.state.has_momentum()
    }

    /// Drops the momentum trajectory and resets the step size. The next trial
    /// is a plain gradient step from the current layout.
    pub fn restart_momentum(&mut self) {
        self.state.trajectory = None;
        self.state.step_size = self.initial_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::initializer::Initializer;
    use nalgebra::Point2;

    fn set(points: &[(f64, f64)]) -> SensorSet {
        points.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn controller(points: &[(f64, f64)], weight: f64, initial_step: f64) -> StepController {
        let descent = DescentConfig {
            initial_step,
            ..DescentConfig::default()
        };
        StepController::new(set(points), ObjectiveEvaluator::new(weight), &descent).unwrap()
    }

    #[test]
    fn new_rejects_empty_layout() {
        let result = StepController::new(
            SensorSet::default(),
            ObjectiveEvaluator::new(1.0),
            &DescentConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::EmptySensorSet)));
    }

    #[test]
    fn new_rejects_non_finite_layout() {
        let result = StepController::new(
            set(&[(f64::NAN, 0.5)]),
            ObjectiveEvaluator::new(1.0),
            &DescentConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::NonFinite { iteration: 0, .. })));
    }

    #[test]
    fn out_of_bounds_trial_only_shrinks_step_size() {
        // Near the left wall the gradient is large enough to throw the sensor far outside.
        let mut ctrl = controller(&[(0.05, 0.5)], 0.0, 0.1);
        let before = ctrl.clone();

        assert_eq!(ctrl.try_step().unwrap(), Trial::OutOfBounds);
        assert_eq!(ctrl.state().step_size, before.state().step_size * SHRINK_FACTOR);
        assert_eq!(ctrl.state().iteration, before.state().iteration);
        assert_eq!(ctrl.state().trajectory, before.state().trajectory);
        assert_eq!(ctrl.sensors(), before.sensors());
        assert_eq!(ctrl.gradient(), before.gradient());
        assert_eq!(ctrl.objective(), before.objective());
    }

    #[test]
    fn uphill_trial_only_shrinks_step_size() {
        // From x = 0.3 a step of 0.01 overshoots to x ≈ 0.98, close to the right wall.
        let mut ctrl = controller(&[(0.3, 0.5)], 0.0, 0.01);
        let before = ctrl.clone();

        assert_eq!(ctrl.try_step().unwrap(), Trial::NoImprovement);
        assert_eq!(ctrl.state().step_size, before.state().step_size * SHRINK_FACTOR);
        assert_eq!(ctrl.state().iteration, before.state().iteration);
        assert_eq!(ctrl.sensors(), before.sensors());
        assert_eq!(ctrl.objective(), before.objective());
    }

    #[test]
    fn accepted_trial_doubles_step_size_and_starts_momentum() {
        let mut ctrl = controller(&[(0.3, 0.5)], 0.0, 1e-4);
        let before = ctrl.clone();

        assert_eq!(ctrl.try_step().unwrap(), Trial::Accepted);
        assert_eq!(ctrl.state().step_size, before.state().step_size * GROWTH_FACTOR);
        assert_eq!(ctrl.state().iteration, 2);
        assert_eq!(ctrl.state().inertia, OptimizerState::inertia_for(1));
        assert!(ctrl.has_momentum());
        assert!(ctrl.objective() < before.objective());
        assert!(ctrl.sensors().points()[0].x > 0.3);
    }

    #[test]
    fn first_accepted_step_is_a_plain_gradient_step() {
        let mut ctrl = controller(&[(0.3, 0.5), (0.6, 0.4)], 1.0, 1e-5);
        let expected = ctrl.sensors().descend(ctrl.gradient(), 1e-5);
        assert_eq!(ctrl.try_step().unwrap(), Trial::Accepted);
        assert_eq!(ctrl.sensors(), &expected);
        assert_eq!(ctrl.state().trajectory.as_ref(), Some(&expected));
    }

    #[test]
    fn step_backtracks_until_a_trial_is_accepted() {
        let mut ctrl = controller(&[(0.05, 0.5)], 0.0, 0.1);
        let outcome = ctrl.step().unwrap();
        assert!(outcome.accepted);
        assert!(outcome.improved);
        assert!(outcome.rejected_trials > 0);
        assert!(outcome.objective < outcome.previous);
    }

    #[test]
    fn step_gives_up_after_backtrack_limit() {
        let descent = DescentConfig {
            initial_step: 0.1,
            max_backtracks: 1,
            restart_on_stall: true,
        };
        let mut ctrl =
            StepController::new(set(&[(0.05, 0.5)]), ObjectiveEvaluator::new(0.0), &descent)
                .unwrap();
        let before = ctrl.objective();

        let outcome = ctrl.step().unwrap();
        assert!(!outcome.accepted);
        assert!(!outcome.improved);
        assert_eq!(outcome.rejected_trials, 1);
        assert_eq!(outcome.objective, before);
        assert_eq!(ctrl.state().iteration, 1);
    }

    #[test]
    fn restart_momentum_resets_trajectory_and_step_size() {
        let mut ctrl = controller(&[(0.3, 0.5)], 0.0, 1e-4);
        ctrl.step().unwrap();
        assert!(ctrl.has_momentum());

        ctrl.restart_momentum();
        assert!(!ctrl.has_momentum());
        assert_eq!(ctrl.state().step_size, 1e-4);
        assert_eq!(ctrl.state().iteration, 2);
    }

    #[test]
    fn accepted_layouts_stay_in_bounds_with_non_increasing_energy() {
        let sensors = Initializer::from_seed(11).scatter(12);
        let mut ctrl = StepController::new(
            sensors,
            ObjectiveEvaluator::new(1.0),
            &DescentConfig::default(),
        )
        .unwrap();

        let mut last = ctrl.objective();
        for _ in 0..200 {
            let outcome = ctrl.step().unwrap();
            if !outcome.accepted {
                ctrl.restart_momentum();
                continue;
            }
            assert!(ctrl.sensors().is_within_unit_square());
            assert!(outcome.objective <= last);
            last = outcome.objective;
        }
    }
}
