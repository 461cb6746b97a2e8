//! Per-stage building blocks for custom pipelines.
//!
//! Most users should call [`crate::PlateAnalyzer`]; these expose the colour
//! conversion, sampling, robust estimation, projection and interpolation
//! steps on their own.

pub use crate::calibration::DEGENERATE_NORM_SQ;
pub use crate::color::{lab_to_rgb, rgb_to_lab, robust_color};
pub use crate::dose::{dose_response_points, interpolate_ic50, FLAT_SEGMENT_EPS, VIABILITY_MIDPOINT};
pub use crate::grid::well_label;
pub use crate::image::sample::{disk_sample_count, effective_radius, sample_disk};
