//! Error types for platelab.

use std::fmt;
use thiserror::Error;

/// Result alias for platelab operations.
pub type PlateLabResult<T> = std::result::Result<T, PlateLabError>;

/// Identifies one of the two calibration reference points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reference {
    /// The 0% viability reference.
    Low,
    /// The 100% viability reference.
    High,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Low => f.write_str("low (0%)"),
            Reference::High => f.write_str("high (100%)"),
        }
    }
}

/// Errors that abort a plate analysis.
///
/// Failures confined to the IC50 step are not errors; see
/// [`crate::dose::Ic50Unavailable`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PlateLabError {
    /// The sampling radius derived from the grid is zero or non-finite.
    #[error("invalid sampling radius {radius}: grid step vectors must be non-degenerate")]
    InvalidRadius { radius: f64 },
    /// A calibration point has no in-bounds pixels to sample.
    #[error("{reference} reference point yielded no pixels; it must lie inside a well")]
    EmptyReferenceSample { reference: Reference },
    /// Image dimensions are zero or overflow.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than one row of pixels.
    #[error("stride {stride} is smaller than the row length {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Pixel buffer is shorter than the declared layout needs.
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Decoding an image from disk failed.
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
