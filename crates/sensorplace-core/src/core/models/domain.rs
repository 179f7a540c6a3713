use super::sensor::SensorPoint;
use nalgebra::Point2;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Domain extent along {axis} must be positive")]
    ZeroExtent { axis: char },
    #[error("Domain of {nx}x{ny} cells is too large to index")]
    TooLarge { nx: usize, ny: usize },
    #[error("Sensor fraction must be a finite value in (0, 1], got {0}")]
    InvalidFraction(f64),
}

/// A rectangular observation grid of `nx` by `ny` cells.
///
/// Sensors are optimized in normalized `[0, 1]²` coordinates; the domain maps
/// those coordinates to pixel positions and to grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Domain {
    nx: usize,
    ny: usize,
}

impl Domain {
    /// Creates a domain with the given extents.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroExtent`] if either extent is zero, or
    /// [`DomainError::TooLarge`] if the cell count overflows `usize`.
    pub fn new(nx: usize, ny: usize) -> Result<Self, DomainError> {
        if nx == 0 {
            return Err(DomainError::ZeroExtent { axis: 'x' });
        }
        if ny == 0 {
            return Err(DomainError::ZeroExtent { axis: 'y' });
        }
        if nx.checked_mul(ny).is_none() {
            return Err(DomainError::TooLarge { nx, ny });
        }
        Ok(Self { nx, ny })
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.nx * self.ny
    }

    /// Number of sensors needed to cover `fraction` of the grid cells.
    ///
    /// The count is `ceil(fraction * nx * ny)` clamped to `[1, nx * ny]`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidFraction`] unless `fraction` is finite and
    /// lies in `(0, 1]`.
    pub fn sensor_count(&self, fraction: f64) -> Result<usize, DomainError> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(DomainError::InvalidFraction(fraction));
        }

        let raw = (fraction * self.nx as f64 * self.ny as f64).ceil();
        let count = (raw as usize).clamp(1, self.num_cells());
        if count as f64 != raw {
            warn!(
                raw,
                clamped = count,
                "Sensor count fell outside [1, {}] and was clamped.",
                self.num_cells()
            );
        }
        Ok(count)
    }

    /// Maps a normalized point to pixel coordinates `(x * (nx - 1), y * (ny - 1))`.
    pub fn to_pixel(&self, point: &SensorPoint) -> Point2<f64> {
        Point2::new(
            point.x * (self.nx - 1) as f64,
            point.y * (self.ny - 1) as f64,
        )
    }

    /// Inverse of [`Domain::to_pixel`]. A single-cell axis maps to `0.0`.
    pub fn from_pixel(&self, pixel: &Point2<f64>) -> SensorPoint {
        let span_x = (self.nx - 1).max(1) as f64;
        let span_y = (self.ny - 1).max(1) as f64;
        Point2::new(pixel.x / span_x, pixel.y / span_y)
    }

    /// Grid cell `(column, row)` containing a normalized point.
    pub fn cell_of(&self, point: &SensorPoint) -> (usize, usize) {
        (
            Self::bin(point.x, self.nx),
            Self::bin(point.y, self.ny),
        )
    }

    /// Flat observation index of the cell containing `point`, with `y` varying fastest.
    pub fn observation_index(&self, point: &SensorPoint) -> usize {
        let (cx, cy) = self.cell_of(point);
        cx * self.ny + cy
    }

    fn bin(coordinate: f64, cells: usize) -> usize {
        let scaled = (coordinate * cells as f64).floor();
        if scaled <= 0.0 {
            0
        } else {
            (scaled as usize).min(cells - 1)
        }
    }
}
