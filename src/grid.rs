//! Well-grid geometry: the affine map from `(row, col)` to pixel centres.

use crate::util::{PlateLabError, PlateLabResult};

/// Fraction of the shorter grid step used as the sampling radius.
pub const DEFAULT_RADIUS_FACTOR: f64 = 0.30;

/// Pixel-space coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when the point is read as a vector.
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Affine basis of the well grid.
///
/// `origin` is the centre of well `(0, 0)`, `u` the step from one column to
/// the next and `v` the step from one row to the next. Both steps must have
/// non-zero length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    pub origin: Point,
    pub u: Point,
    pub v: Point,
}

impl GridConfig {
    /// Creates a grid basis.
    pub const fn new(origin: Point, u: Point, v: Point) -> Self {
        Self { origin, u, v }
    }

    /// Axis-aligned grid with the given column and row pitch.
    pub const fn axis_aligned(origin: Point, col_pitch: f64, row_pitch: f64) -> Self {
        Self {
            origin,
            u: Point::new(col_pitch, 0.0),
            v: Point::new(0.0, row_pitch),
        }
    }

    /// Pixel centre of well `(row, col)`: `origin + col * u + row * v`.
    pub fn center(&self, row: usize, col: usize) -> Point {
        let (r, c) = (row as f64, col as f64);
        Point {
            x: self.origin.x + c * self.u.x + r * self.v.x,
            y: self.origin.y + c * self.u.y + r * self.v.y,
        }
    }

    /// Sampling radius `factor * min(|u|, |v|)`.
    ///
    /// Fails with [`PlateLabError::InvalidRadius`] when the result is zero,
    /// negative or non-finite, which happens whenever a step vector is
    /// degenerate.
    pub fn sampling_radius(&self, factor: f64) -> PlateLabResult<f64> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(PlateLabError::InvalidInput(
                "radius factor must be finite and positive",
            ));
        }
        if !self.origin.is_finite() {
            return Err(PlateLabError::InvalidInput("grid origin must be finite"));
        }
        let radius = factor * self.u.norm().min(self.v.norm());
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PlateLabError::InvalidRadius { radius });
        }
        Ok(radius)
    }
}

/// Human label for a well: row letters followed by the 1-based column.
///
/// Rows past `Z` continue spreadsheet-style: `AA`, `AB`, ...
pub fn well_label(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = row + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    let mut label: String = letters.into_iter().rev().collect();
    label.push_str(&(col + 1).to_string());
    label
}
