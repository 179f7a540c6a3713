use nalgebra::{Point2, Vector2};

/// Location of a single sensor in normalized `[0, 1]²` domain coordinates.
pub type SensorPoint = Point2<f64>;

/// An ordered collection of sensor locations.
///
/// Index identity is significant: entry `i` of a [`GradientField`] evaluated
/// for this set refers to point `i`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorSet {
    points: Vec<SensorPoint>,
}

impl SensorSet {
    pub fn new(points: Vec<SensorPoint>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[SensorPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorPoint> {
        self.points.iter()
    }

    /// Returns `true` if every coordinate lies in the closed unit interval.
    pub fn is_within_unit_square(&self) -> bool {
        self.points
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y))
    }

    pub fn is_finite(&self) -> bool {
        self.points
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Moves every point against its gradient: `p_i - step * g_i`.
    pub fn descend(&self, gradient: &GradientField, step: f64) -> SensorSet {
        debug_assert_eq!(self.len(), gradient.len());
        self.points
            .iter()
            .zip(gradient.iter())
            .map(|(p, g)| p - g * step)
            .collect()
    }

    /// Point-wise convex combination `weight * self + (1 - weight) * other`.
    pub fn blend(&self, other: &SensorSet, weight: f64) -> SensorSet {
        debug_assert_eq!(self.len(), other.len());
        self.points
            .iter()
            .zip(other.points.iter())
            .map(|(a, b)| Point2::from(a.coords * weight + b.coords * (1.0 - weight)))
            .collect()
    }

    pub fn centroid(&self) -> Option<SensorPoint> {
        if self.points.is_empty() {
            return None;
        }
        let sum = self
            .points
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.coords);
        Some(Point2::from(sum / self.points.len() as f64))
    }

    /// Smallest Euclidean distance between two distinct sensors, if there are at least two.
    pub fn min_pairwise_distance(&self) -> Option<f64> {
        let mut min_sq: Option<f64> = None;
        for (i, a) in self.points.iter().enumerate() {
            for b in &self.points[i + 1..] {
                let sq = (a - b).norm_squared();
                min_sq = Some(min_sq.map_or(sq, |m| m.min(sq)));
            }
        }
        min_sq.map(f64::sqrt)
    }
}

impl From<Vec<SensorPoint>> for SensorSet {
    fn from(points: Vec<SensorPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<SensorPoint> for SensorSet {
    fn from_iter<I: IntoIterator<Item = SensorPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Per-sensor partial derivatives of the objective, in sensor order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientField {
    components: Vec<Vector2<f64>>,
}

impl GradientField {
    pub fn new(components: Vec<Vector2<f64>>) -> Self {
        Self { components }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Vector2<f64>] {
        &self.components
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector2<f64>> {
        self.components.iter()
    }

    pub fn is_finite(&self) -> bool {
        self.components
            .iter()
            .all(|g| g.x.is_finite() && g.y.is_finite())
    }
}

impl FromIterator<Vector2<f64>> for GradientField {
    fn from_iter<I: IntoIterator<Item = Vector2<f64>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
