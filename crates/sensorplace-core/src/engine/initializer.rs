use crate::core::models::domain::{Domain, DomainError};
use crate::core::models::sensor::SensorSet;
use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Draws starting layouts from an explicitly owned random source.
pub struct Initializer<R: Rng> {
    rng: R,
}

impl Initializer<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Initializer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// `count` points with both coordinates drawn uniformly from `[0, 1]`, `x` before `y`.
    pub fn scatter(&mut self, count: usize) -> SensorSet {
        (0..count)
            .map(|_| {
                let x = self.rng.gen_range(0.0..=1.0);
                let y = self.rng.gen_range(0.0..=1.0);
                Point2::new(x, y)
            })
            .collect()
    }

    /// Sizes the layout from the domain density and scatters it.
    pub fn initialize(&mut self, domain: &Domain, fraction: f64) -> Result<SensorSet, DomainError> {
        let count = domain.sensor_count(fraction)?;
        debug!(
            nx = domain.nx(),
            ny = domain.ny(),
            fraction,
            count,
            "Scattering initial sensor layout."
        );
        Ok(self.scatter(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_layout() {
        let a = Initializer::from_seed(42).scatter(16);
        let b = Initializer::from_seed(42).scatter(16);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_give_different_layouts() {
        let a = Initializer::from_seed(1).scatter(8);
        let b = Initializer::from_seed(2).scatter(8);
        assert_ne!(a, b);
    }

    #[test]
    fn scattered_points_lie_in_unit_square() {
        let sensors = Initializer::from_seed(7).scatter(500);
        assert_eq!(sensors.len(), 500);
        assert!(sensors.is_within_unit_square());
    }

    #[test]
    fn initialize_sizes_layout_from_density() {
        let domain = Domain::new(127, 97).unwrap();
        let sensors = Initializer::from_seed(0).initialize(&domain, 0.01).unwrap();
        assert_eq!(sensors.len(), 124);
    }

    #[test]
    fn initialize_rejects_invalid_fraction() {
        let domain = Domain::new(10, 10).unwrap();
        let result = Initializer::from_seed(0).initialize(&domain, 0.0);
        assert_eq!(result, Err(DomainError::InvalidFraction(0.0)));
    }
}
