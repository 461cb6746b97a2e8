//! Dose-response aggregation and IC50 estimation.
//!
//! Each row of the plate is one dose. Rows with a positive concentration
//! contribute the mean viability of their measured wells; the resulting
//! points are sorted by concentration and the first adjacent pair whose
//! viabilities straddle 50% is linearly interpolated. There is no curve
//! fitting.
//!
//! Every failure here is an expected property of the data, so nothing in
//! this module returns [`crate::PlateLabError`]; an undetermined IC50 is
//! reported as [`Ic50Unavailable`].

use crate::analysis::{WellResult, WellStatus};
use thiserror::Error;

/// Viability level the IC50 is defined at, in percent.
pub const VIABILITY_MIDPOINT: f64 = 50.0;

/// Viability difference below which a bracketing segment is treated as flat.
pub const FLAT_SEGMENT_EPS: f64 = 1e-9;

/// Mean viability of one dose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DosePoint {
    pub concentration: f64,
    /// Percent, `[0, 100]`.
    pub viability: f64,
}

/// Estimated half-maximal inhibitory concentration.
#[derive(Clone, Debug, PartialEq)]
pub struct Ic50 {
    pub value: f64,
    /// Opaque unit label, passed through unchanged.
    pub units: String,
}

/// Why an IC50 could not be determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Ic50Unavailable {
    /// Fewer than two usable doses.
    #[error("need at least two positive doses, found {positive}")]
    InsufficientDoseData { positive: usize },
    /// Viability stays on one side of 50% across the whole series.
    #[error("viability never crosses 50% across the dose series")]
    NoViabilityCrossing,
    /// The bracketing doses have (nearly) the same viability.
    #[error("bracketing doses have indistinguishable viability")]
    UnstableInterpolation,
    /// Interpolation overflowed or produced NaN.
    #[error("interpolated IC50 is not finite")]
    NonFiniteResult,
}

fn is_dose(concentration: f64) -> bool {
    concentration > 0.0 && concentration.is_finite()
}

/// Per-row `(concentration, mean viability)` pairs, sorted by concentration.
///
/// Rows without a positive concentration, rows at or beyond `row_count` and
/// rows without a measured well are dropped. `Unmeasured` wells do not count
/// towards a row's mean.
pub fn dose_response_points(
    wells: &[WellResult],
    row_concentrations: &[f64],
    row_count: usize,
) -> Vec<DosePoint> {
    let mut sums = vec![(0.0f64, 0usize); row_count];
    for well in wells {
        if well.status == WellStatus::Unmeasured {
            continue;
        }
        if let Some(slot) = sums.get_mut(well.row) {
            slot.0 += well.viability;
            slot.1 += 1;
        }
    }

    let mut points: Vec<DosePoint> = sums
        .iter()
        .enumerate()
        .filter_map(|(row, &(sum, count))| {
            let concentration = *row_concentrations.get(row)?;
            if !is_dose(concentration) || count == 0 {
                return None;
            }
            Some(DosePoint {
                concentration,
                viability: sum / count as f64,
            })
        })
        .collect();
    points.sort_by(|a, b| a.concentration.total_cmp(&b.concentration));
    points
}

/// Interpolates the 50% crossing of a dose series sorted by concentration.
pub fn interpolate_ic50(points: &[DosePoint]) -> Result<f64, Ic50Unavailable> {
    if points.len() < 2 {
        return Err(Ic50Unavailable::InsufficientDoseData {
            positive: points.len(),
        });
    }

    let (p1, p2) = points
        .windows(2)
        .find_map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let a_above = a.viability >= VIABILITY_MIDPOINT;
            let b_above = b.viability >= VIABILITY_MIDPOINT;
            match (a_above, b_above) {
                (false, true) => Some((a, b)),
                (true, false) => Some((b, a)),
                _ => None,
            }
        })
        .ok_or(Ic50Unavailable::NoViabilityCrossing)?;

    // p1 is the lower-viability point regardless of dose direction.
    let dv = p2.viability - p1.viability;
    if dv.abs() < FLAT_SEGMENT_EPS {
        return Err(Ic50Unavailable::UnstableInterpolation);
    }
    let ic50 = p1.concentration
        + (VIABILITY_MIDPOINT - p1.viability) * (p2.concentration - p1.concentration) / dv;
    if !ic50.is_finite() {
        return Err(Ic50Unavailable::NonFiniteResult);
    }
    Ok(ic50)
}

/// Estimates the IC50 of a plate, reporting why when it cannot.
pub fn try_estimate_ic50(
    wells: &[WellResult],
    row_concentrations: &[f64],
    row_count: usize,
    units: &str,
) -> Result<Ic50, Ic50Unavailable> {
    let positive = row_concentrations.iter().filter(|&&c| is_dose(c)).count();
    if positive < 2 {
        return Err(Ic50Unavailable::InsufficientDoseData { positive });
    }
    let points = dose_response_points(wells, row_concentrations, row_count);
    let value = interpolate_ic50(&points)?;
    Ok(Ic50 {
        value,
        units: units.to_owned(),
    })
}

/// Estimates the IC50 of a plate; `None` when it is indeterminate.
pub fn estimate_ic50(
    wells: &[WellResult],
    row_concentrations: &[f64],
    row_count: usize,
    units: &str,
) -> Option<Ic50> {
    try_estimate_ic50(wells, row_concentrations, row_count, units).ok()
}

#[cfg(test)]
mod tests {
    use super::{
        dose_response_points, estimate_ic50, interpolate_ic50, try_estimate_ic50, DosePoint,
        Ic50Unavailable,
    };
    use crate::analysis::{WellResult, WellStatus};
    use crate::color::Rgb;
    use crate::grid::Point;

    fn well(row: usize, col: usize, viability: f64, status: WellStatus) -> WellResult {
        WellResult {
            id: crate::grid::well_label(row, col),
            row,
            col,
            center: Point::default(),
            avg_color: Rgb::BLACK,
            intensity: viability / 100.0,
            viability,
            sample_count: 10,
            status,
        }
    }

    fn points(pairs: &[(f64, f64)]) -> Vec<DosePoint> {
        pairs
            .iter()
            .map(|&(concentration, viability)| DosePoint {
                concentration,
                viability,
            })
            .collect()
    }

    #[test]
    fn bracketing_pair_is_interpolated() {
        let series = points(&[(1.0, 90.0), (10.0, 60.0), (100.0, 40.0), (1000.0, 10.0)]);
        let ic50 = interpolate_ic50(&series).unwrap();
        assert!((ic50 - 55.0).abs() < 1e-9);
    }

    #[test]
    fn rising_series_interpolates_from_low_viability_side() {
        let series = points(&[(1.0, 20.0), (3.0, 70.0)]);
        let ic50 = interpolate_ic50(&series).unwrap();
        assert!((ic50 - 2.2).abs() < 1e-9);
    }

    #[test]
    fn exactly_fifty_counts_as_above() {
        let series = points(&[(2.0, 50.0), (4.0, 30.0)]);
        assert!((interpolate_ic50(&series).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn overflowing_interpolation_is_not_finite() {
        let series = points(&[(1.0, -1e300), (f64::MAX, 60.0)]);
        assert_eq!(
            interpolate_ic50(&series),
            Err(Ic50Unavailable::NonFiniteResult)
        );
    }

    #[test]
    fn near_flat_bracket_is_unstable() {
        let series = points(&[(1.0, 50.0), (2.0, 50.0 - 1e-11)]);
        assert_eq!(
            interpolate_ic50(&series),
            Err(Ic50Unavailable::UnstableInterpolation)
        );
    }

    #[test]
    fn series_without_crossing_has_no_ic50() {
        let series = points(&[(1.0, 90.0), (10.0, 80.0)]);
        assert_eq!(
            interpolate_ic50(&series),
            Err(Ic50Unavailable::NoViabilityCrossing)
        );
    }

    #[test]
    fn single_dose_is_rejected() {
        let wells = vec![
            well(0, 0, 90.0, WellStatus::Measured),
            well(1, 0, 10.0, WellStatus::Measured),
        ];
        assert_eq!(
            try_estimate_ic50(&wells, &[0.0, 5.0], 2, "uM"),
            Err(Ic50Unavailable::InsufficientDoseData { positive: 1 })
        );
        assert_eq!(estimate_ic50(&wells, &[0.0, 5.0], 2, "uM"), None);
    }

    #[test]
    fn rows_are_averaged_and_sorted_by_dose() {
        let wells = vec![
            well(0, 0, 80.0, WellStatus::Measured),
            well(0, 1, 100.0, WellStatus::Measured),
            well(1, 0, 20.0, WellStatus::Measured),
            well(1, 1, 40.0, WellStatus::Measured),
            well(2, 0, 100.0, WellStatus::Measured),
        ];
        // Row 2 is a vehicle control and drops out.
        let pts = dose_response_points(&wells, &[1.0, 0.5, 0.0], 3);
        assert_eq!(pts, points(&[(0.5, 30.0), (1.0, 90.0)]));

        let ic50 = estimate_ic50(&wells, &[1.0, 0.5, 0.0], 3, "mg/mL").unwrap();
        assert_eq!(ic50.units, "mg/mL");
        // 0.5 + (50 - 30) * 0.5 / 60
        assert!((ic50.value - (0.5 + 20.0 * 0.5 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn unmeasured_wells_do_not_dilute_row_means() {
        let wells = vec![
            well(0, 0, 90.0, WellStatus::Measured),
            well(0, 1, 0.0, WellStatus::Unmeasured),
            well(1, 0, 0.0, WellStatus::Unmeasured),
            well(2, 0, 10.0, WellStatus::Measured),
        ];
        let pts = dose_response_points(&wells, &[1.0, 10.0, 100.0], 3);
        assert_eq!(pts, points(&[(1.0, 90.0), (100.0, 10.0)]));
    }

    #[test]
    fn rows_beyond_row_count_are_ignored() {
        let wells = vec![
            well(0, 0, 90.0, WellStatus::Measured),
            well(1, 0, 10.0, WellStatus::Measured),
        ];
        let pts = dose_response_points(&wells, &[1.0, 10.0], 1);
        assert_eq!(pts, points(&[(1.0, 90.0)]));
        assert_eq!(
            try_estimate_ic50(&wells, &[1.0, 10.0], 1, ""),
            Err(Ic50Unavailable::InsufficientDoseData { positive: 1 })
        );
    }
}
