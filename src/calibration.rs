//! Viability axis spanned by the two reference colours.
//!
//! A well's intensity is the scalar projection of `lab(well) - lab(low)` onto
//! `lab(high) - lab(low)`, divided by the squared axis length and clamped to
//! `[0, 1]`.

use crate::color::{rgb_to_lab, Lab, Rgb};
use crate::util::math::{dot3, sub3};

/// Squared Lab distance below which the references count as identical.
pub const DEGENERATE_NORM_SQ: f64 = 1e-6;

/// Calibration axis in Lab space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationAxis {
    low: Lab,
    gradient: [f64; 3],
    norm_sq: f64,
}

impl CalibrationAxis {
    /// Builds the axis from the 0% (`low`) and 100% (`high`) reference colours.
    pub fn new(low: Rgb, high: Rgb) -> Self {
        let low = rgb_to_lab(low);
        let high = rgb_to_lab(high);
        let gradient = sub3(high.to_array(), low.to_array());
        let norm_sq = dot3(gradient, gradient);
        Self {
            low,
            gradient,
            norm_sq,
        }
    }

    /// Lab colour of the 0% reference.
    pub fn low(&self) -> Lab {
        self.low
    }

    /// Vector from the low to the high reference, as `[dL, da, db]`.
    pub fn gradient(&self) -> [f64; 3] {
        self.gradient
    }

    /// Squared length of [`Self::gradient`].
    pub fn norm_sq(&self) -> f64 {
        self.norm_sq
    }

    /// True when the references are too close to define a direction.
    pub fn is_degenerate(&self) -> bool {
        self.norm_sq < DEGENERATE_NORM_SQ
    }

    /// Projects `color` onto the axis, clamped to `[0, 1]`.
    ///
    /// Returns `None` for a degenerate axis.
    pub fn project(&self, color: Rgb) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        let offset = sub3(rgb_to_lab(color).to_array(), self.low.to_array());
        let t = dot3(offset, self.gradient) / self.norm_sq;
        Some(t.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::CalibrationAxis;
    use crate::color::Rgb;

    const PURPLE: Rgb = Rgb::new(92, 38, 134);
    const YELLOW: Rgb = Rgb::new(236, 214, 70);

    #[test]
    fn references_project_to_the_ends() {
        let axis = CalibrationAxis::new(PURPLE, YELLOW);
        assert!(!axis.is_degenerate());
        assert!(axis.project(PURPLE).unwrap().abs() < 1e-9);
        assert!((axis.project(YELLOW).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn projection_is_clamped() {
        let axis = CalibrationAxis::new(PURPLE, YELLOW);
        for color in [
            Rgb::new(255, 255, 0),
            Rgb::new(0, 0, 0),
            Rgb::new(255, 255, 255),
            Rgb::new(0, 0, 255),
        ] {
            let t = axis.project(color).unwrap();
            assert!((0.0..=1.0).contains(&t), "{color:?} -> {t}");
        }
    }

    #[test]
    fn midpoint_in_lab_projects_near_half() {
        let axis = CalibrationAxis::new(PURPLE, YELLOW);
        let low = axis.low();
        let g = axis.gradient();
        let mid = crate::color::lab_to_rgb(crate::color::Lab::new(
            low.l + 0.5 * g[0],
            low.a + 0.5 * g[1],
            low.b + 0.5 * g[2],
        ));
        let t = axis.project(mid).unwrap();
        assert!((t - 0.5).abs() < 0.02, "{t}");
    }

    #[test]
    fn identical_references_are_degenerate() {
        let axis = CalibrationAxis::new(PURPLE, PURPLE);
        assert!(axis.is_degenerate());
        assert_eq!(axis.norm_sq(), 0.0);
        assert_eq!(axis.project(YELLOW), None);
    }
}
