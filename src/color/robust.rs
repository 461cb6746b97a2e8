//! Outlier-resistant representative colour of a pixel sample.
//!
//! Each pixel is moved to Lab and the median is taken independently per
//! channel (a marginal median, not a joint vector statistic). Glare and
//! shadow pixels sit at the extremes of L*, so a minority of them does not
//! move the estimate.

use super::{lab_to_rgb, rgb_to_lab, Lab, Rgb};
use crate::util::math::median_in_place;

/// Reduces `pixels` to one representative colour.
///
/// Returns [`Rgb::BLACK`] for an empty slice. That value is a sentinel, not a
/// measurement: callers must check the sample count themselves. A single
/// pixel is returned unchanged.
pub fn robust_color(pixels: &[Rgb]) -> Rgb {
    match pixels {
        [] => Rgb::BLACK,
        [only] => *only,
        _ => lab_to_rgb(median_lab(pixels)),
    }
}

/// Per-channel Lab median of a non-empty sample.
pub(crate) fn median_lab(pixels: &[Rgb]) -> Lab {
    let mut ls = Vec::with_capacity(pixels.len());
    let mut as_ = Vec::with_capacity(pixels.len());
    let mut bs = Vec::with_capacity(pixels.len());
    for &px in pixels {
        let lab = rgb_to_lab(px);
        ls.push(lab.l);
        as_.push(lab.a);
        bs.push(lab.b);
    }
    Lab {
        l: median_in_place(&mut ls).unwrap_or_default(),
        a: median_in_place(&mut as_).unwrap_or_default(),
        b: median_in_place(&mut bs).unwrap_or_default(),
    }
}
