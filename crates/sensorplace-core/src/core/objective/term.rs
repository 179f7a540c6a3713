use std::ops::{Add, AddAssign};

/// Objective value split into its wall-repulsion and sensor-repulsion parts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyTerm {
    pub boundary: f64,
    pub mutual: f64,
}

impl EnergyTerm {
    pub fn new(boundary: f64, mutual: f64) -> Self {
        Self { boundary, mutual }
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.boundary + self.mutual
    }

    pub fn is_finite(&self) -> bool {
        self.boundary.is_finite() && self.mutual.is_finite()
    }
}

impl Add for EnergyTerm {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            boundary: self.boundary + rhs.boundary,
            mutual: self.mutual + rhs.mutual,
        }
    }
}

impl AddAssign for EnergyTerm {
    fn add_assign(&mut self, rhs: Self) {
        self.boundary += rhs.boundary;
        self.mutual += rhs.mutual;
    }
}
