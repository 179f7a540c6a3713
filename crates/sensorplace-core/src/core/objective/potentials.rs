use nalgebra::Vector2;

/// Regularization added to every squared distance, `sqrt(f64::EPSILON)`.
pub const REGULARIZATION: f64 = 1.490_116_119_384_765_6e-8;

/// Repulsion of one coordinate `t` from both walls of the unit interval.
///
/// Returns the energy `1/(t² + ε) + 1/((1 - t)² + ε)` together with half of its
/// derivative, `-t/(t² + ε)² + (1 - t)/((1 - t)² + ε)²`.
#[inline]
pub fn boundary_repulsion(t: f64) -> (f64, f64) {
    let near = 1.0 / (t * t + REGULARIZATION);
    let far = 1.0 / ((1.0 - t) * (1.0 - t) + REGULARIZATION);
    (near + far, -t * near * near + (1.0 - t) * far * far)
}

#[inline]
pub fn regularized_sq_distance(delta: &Vector2<f64>) -> f64 {
    delta.x * delta.x + delta.y * delta.y + REGULARIZATION
}
