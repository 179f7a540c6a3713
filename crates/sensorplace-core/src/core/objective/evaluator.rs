use super::potentials::{REGULARIZATION, boundary_repulsion, regularized_sq_distance};
use super::term::EnergyTerm;
use crate::core::models::sensor::{GradientField, SensorPoint, SensorSet};
use nalgebra::Vector2;
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Objective value and gradient of a sensor layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    pub energy: EnergyTerm,
    pub gradient: GradientField,
}

impl Evaluation {
    /// The scalar objective `J`.
    #[inline]
    pub fn objective(&self) -> f64 {
        self.energy.total()
    }

    pub fn is_finite(&self) -> bool {
        self.energy.is_finite() && self.gradient.is_finite()
    }
}

/// Computes the sensor-spreading energy and its gradient.
///
/// Every sensor is repelled by the four walls of the unit square and by every
/// sensor of the layout, itself included, with a pair weight of `W / N`. The
/// self pair adds the constant `W / ε` to the objective and nothing to the
/// gradient.
///
/// The gradient is the exact derivative of the objective. Each unordered pair
/// appears twice in the double sum, so the pair part of `∂J/∂xᵢ` carries a
/// factor of `4 W / N`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveEvaluator {
    repulsion_weight: f64,
}

struct SensorContribution {
    energy: EnergyTerm,
    gradient: Vector2<f64>,
}

impl ObjectiveEvaluator {
    pub fn new(repulsion_weight: f64) -> Self {
        Self { repulsion_weight }
    }

    /// Evaluates the objective and gradient of `sensors` in one O(N²) pass.
    ///
    /// Per-sensor contributions are summed in index order, so the result does
    /// not depend on how the pass is scheduled across threads.
    #[instrument(level = "trace", skip_all, fields(sensors = sensors.len()))]
    pub fn evaluate(&self, sensors: &SensorSet) -> Evaluation {
        let points = sensors.points();
        if points.is_empty() {
            return Evaluation::default();
        }
        let coupling = self.repulsion_weight / points.len() as f64;

        #[cfg(not(feature = "parallel"))]
        let iterator = points.iter();

        #[cfg(feature = "parallel")]
        let iterator = points.par_iter();

        let contributions: Vec<SensorContribution> = iterator
            .map(|point| Self::sensor_contribution(point, points, coupling))
            .collect();

        let mut energy = EnergyTerm::default();
        let mut gradient = Vec::with_capacity(contributions.len());
        for contribution in contributions {
            energy += contribution.energy;
            gradient.push(contribution.gradient);
        }

        Evaluation {
            energy,
            gradient: GradientField::new(gradient),
        }
    }

    fn sensor_contribution(
        point: &SensorPoint,
        points: &[SensorPoint],
        coupling: f64,
    ) -> SensorContribution {
        let (wall_x, half_slope_x) = boundary_repulsion(point.x);
        let (wall_y, half_slope_y) = boundary_repulsion(point.y);

        let mut mutual = 0.0;
        let mut push = Vector2::zeros();
        for other in points {
            let delta = point - other;
            let sq_dist = regularized_sq_distance(&delta);
            mutual += coupling / sq_dist;
            push -= delta / (sq_dist * sq_dist);
        }

        SensorContribution {
            energy: EnergyTerm::new(wall_x + wall_y, mutual),
            gradient: Vector2::new(
                2.0 * (2.0 * coupling * push.x + half_slope_x),
                2.0 * (2.0 * coupling * push.y + half_slope_y),
            ),
        }
    }
}

/// Energy that the self pairs alone add to a layout evaluated with weight `w`.
pub fn self_pair_offset(repulsion_weight: f64) -> f64 {
    repulsion_weight / REGULARIZATION
}
