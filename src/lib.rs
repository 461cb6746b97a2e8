//! Platelab quantifies cell viability from a photograph of a multi-well
//! assay plate and estimates the IC50 of the plate's dose series.
//!
//! The pipeline samples a disk of pixels at every well centre of an affine
//! grid, reduces each sample to a glare-resistant colour with a per-channel
//! CIE L*a*b* median, projects that colour onto the axis between a 0% and a
//! 100% viability reference well, and linearly interpolates the dose at which
//! row-mean viability crosses 50%.
//!
//! Optional features: `rayon` (parallel well measurement), `image-io`
//! (decoding via the `image` crate) and `tracing` (spans and events).

pub mod analysis;
pub mod calibration;
pub mod color;
pub mod dose;
pub mod grid;
pub mod image;
pub mod lowlevel;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use analysis::{
    analyze_plate, AnalysisConfig, PlateAnalysis, PlateAnalyzer, PlateRequest, ReferenceSample,
    WellResult, WellStatus,
};
pub use calibration::CalibrationAxis;
pub use color::{Lab, Rgb};
pub use dose::{estimate_ic50, try_estimate_ic50, DosePoint, Ic50, Ic50Unavailable};
pub use grid::{GridConfig, Point, DEFAULT_RADIUS_FACTOR};
pub use crate::image::{OwnedRgbImage, PixelFormat, PixelSource, RgbImageView};
pub use util::{PlateLabError, PlateLabResult, Reference};
