//! Plate analysis: calibrate on two reference wells, measure every well of
//! the grid, then estimate the IC50 of the dose series.
//!
//! Structural problems (a degenerate grid, a reference point with no pixels)
//! abort the whole analysis. Problems confined to the IC50 step never do; the
//! well results are always returned in full, in row-major order.

use crate::calibration::CalibrationAxis;
use crate::color::{robust_color, Rgb};
use crate::dose::{dose_response_points, try_estimate_ic50, DosePoint, Ic50, Ic50Unavailable};
use crate::grid::{well_label, GridConfig, Point, DEFAULT_RADIUS_FACTOR};
use crate::image::sample::sample_disk;
use crate::image::PixelSource;
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{PlateLabError, PlateLabResult, Reference};

#[cfg(feature = "rayon")]
mod parallel;

/// Tunables of an analysis run.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    /// Sampling radius as a fraction of the shorter grid step.
    pub radius_factor: f64,
    /// Measure wells on the rayon pool (requires the `rayon` feature;
    /// ignored otherwise). Output is identical to the sequential path.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            radius_factor: DEFAULT_RADIUS_FACTOR,
            parallel: false,
        }
    }
}

/// Geometry, calibration and dosing inputs for one plate.
#[derive(Clone, Debug, PartialEq)]
pub struct PlateRequest {
    pub grid: GridConfig,
    pub rows: usize,
    pub cols: usize,
    /// Pixel position of the 0% viability reference.
    pub reference_low: Point,
    /// Pixel position of the 100% viability reference.
    pub reference_high: Point,
    /// One concentration per row; zero or negative marks a row outside the
    /// dose series.
    pub row_concentrations: Vec<f64>,
    /// Unit label attached to the IC50, passed through unchanged.
    pub units: String,
}

/// How a well's intensity was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WellStatus {
    /// Sampled and projected normally.
    Measured,
    /// No pixel of the well lies inside the image; intensity is reported as 0.
    Unmeasured,
    /// The reference colours are indistinguishable; intensity is reported as 0.
    DegenerateCalibration,
}

impl WellStatus {
    /// Stable lowercase name, for reports.
    pub fn as_str(self) -> &'static str {
        match self {
            WellStatus::Measured => "measured",
            WellStatus::Unmeasured => "unmeasured",
            WellStatus::DegenerateCalibration => "degenerate_calibration",
        }
    }
}

/// Measurement of one grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct WellResult {
    /// Row letters plus 1-based column, e.g. `B7`.
    pub id: String,
    pub row: usize,
    pub col: usize,
    pub center: Point,
    /// Robust representative colour; black when nothing was sampled.
    pub avg_color: Rgb,
    /// Calibrated projection, `[0, 1]`.
    pub intensity: f64,
    /// `intensity * 100`.
    pub viability: f64,
    /// Number of pixels the colour was estimated from.
    pub sample_count: usize,
    pub status: WellStatus,
}

/// A sampled calibration point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceSample {
    pub point: Point,
    pub color: Rgb,
    pub sample_count: usize,
}

/// Output of [`PlateAnalyzer::analyze`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlateAnalysis {
    /// One entry per well, row-major.
    pub wells: Vec<WellResult>,
    pub rows: usize,
    pub cols: usize,
    /// Sampling radius in pixels before flooring.
    pub radius: f64,
    pub reference_low: ReferenceSample,
    pub reference_high: ReferenceSample,
    pub calibration: CalibrationAxis,
    /// Dose series used for the IC50, sorted by concentration.
    pub dose_points: Vec<DosePoint>,
    pub ic50: Result<Ic50, Ic50Unavailable>,
}

impl PlateAnalysis {
    /// The IC50, if it could be determined.
    pub fn ic50(&self) -> Option<&Ic50> {
        self.ic50.as_ref().ok()
    }

    /// Why the IC50 is missing, if it is.
    pub fn ic50_unavailable(&self) -> Option<Ic50Unavailable> {
        self.ic50.as_ref().err().copied()
    }

    /// The result for well `(row, col)`.
    pub fn well(&self, row: usize, col: usize) -> Option<&WellResult> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.wells.get(row * self.cols + col)
    }

    /// Wells that could not be sampled.
    pub fn unmeasured(&self) -> impl Iterator<Item = &WellResult> {
        self.wells
            .iter()
            .filter(|well| well.status == WellStatus::Unmeasured)
    }
}

/// Shared read-only state of the per-well loop.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WellContext {
    pub(crate) grid: GridConfig,
    pub(crate) radius: f64,
    pub(crate) axis: CalibrationAxis,
}

/// Runs plate analyses with a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct PlateAnalyzer {
    cfg: AnalysisConfig,
}

impl PlateAnalyzer {
    /// Creates an analyzer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: AnalysisConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.cfg
    }

    /// Analyzes one plate image.
    pub fn analyze<S>(&self, image: &S, request: &PlateRequest) -> PlateLabResult<PlateAnalysis>
    where
        S: PixelSource + Sync + ?Sized,
    {
        let _span =
            trace_span!("analyze_plate", rows = request.rows, cols = request.cols).entered();

        let radius = request.grid.sampling_radius(self.cfg.radius_factor)?;
        trace_event!("sampling_radius", radius = radius);
        if request.rows.checked_mul(request.cols).is_none() {
            return Err(PlateLabError::InvalidInput("well count overflows"));
        }

        let reference_low =
            sample_reference(image, request.reference_low, radius, Reference::Low)?;
        let reference_high =
            sample_reference(image, request.reference_high, radius, Reference::High)?;
        trace_event!(
            "references",
            low_samples = reference_low.sample_count,
            high_samples = reference_high.sample_count
        );

        let axis = CalibrationAxis::new(reference_low.color, reference_high.color);
        trace_event!(
            "calibration",
            norm_sq = axis.norm_sq(),
            degenerate = axis.is_degenerate()
        );

        let ctx = WellContext {
            grid: request.grid,
            radius,
            axis,
        };
        let wells = self.measure_all(image, &ctx, request.rows, request.cols);
        #[cfg(feature = "tracing")]
        {
            let unmeasured = wells
                .iter()
                .filter(|w| w.status == WellStatus::Unmeasured)
                .count();
            trace_event!("wells_measured", count = wells.len(), unmeasured = unmeasured);
        }

        let dose_points = dose_response_points(&wells, &request.row_concentrations, request.rows);
        let ic50 = try_estimate_ic50(
            &wells,
            &request.row_concentrations,
            request.rows,
            &request.units,
        );
        trace_event!("ic50", determined = ic50.is_ok());

        Ok(PlateAnalysis {
            wells,
            rows: request.rows,
            cols: request.cols,
            radius,
            reference_low,
            reference_high,
            calibration: axis,
            dose_points,
            ic50,
        })
    }

    fn measure_all<S>(
        &self,
        image: &S,
        ctx: &WellContext,
        rows: usize,
        cols: usize,
    ) -> Vec<WellResult>
    where
        S: PixelSource + Sync + ?Sized,
    {
        let _span = trace_span!("measure_wells", parallel = self.cfg.parallel).entered();
        #[cfg(feature = "rayon")]
        {
            if self.cfg.parallel {
                return parallel::measure_wells_par(image, ctx, rows, cols);
            }
        }
        measure_wells(image, ctx, rows, cols)
    }
}

/// Analyzes one plate with the default configuration.
pub fn analyze_plate<S>(image: &S, request: &PlateRequest) -> PlateLabResult<PlateAnalysis>
where
    S: PixelSource + Sync + ?Sized,
{
    PlateAnalyzer::new().analyze(image, request)
}

fn sample_reference<S>(
    image: &S,
    point: Point,
    radius: f64,
    reference: Reference,
) -> PlateLabResult<ReferenceSample>
where
    S: PixelSource + ?Sized,
{
    let pixels = sample_disk(image, point, radius);
    if pixels.is_empty() {
        return Err(PlateLabError::EmptyReferenceSample { reference });
    }
    Ok(ReferenceSample {
        point,
        color: robust_color(&pixels),
        sample_count: pixels.len(),
    })
}

fn measure_wells<S>(image: &S, ctx: &WellContext, rows: usize, cols: usize) -> Vec<WellResult>
where
    S: PixelSource + ?Sized,
{
    let mut wells = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            wells.push(measure_well(image, ctx, row, col));
        }
    }
    wells
}

pub(crate) fn measure_well<S>(image: &S, ctx: &WellContext, row: usize, col: usize) -> WellResult
where
    S: PixelSource + ?Sized,
{
    let center = ctx.grid.center(row, col);
    let pixels = sample_disk(image, center, ctx.radius);
    let avg_color = robust_color(&pixels);

    let (intensity, status) = if pixels.is_empty() {
        (0.0, WellStatus::Unmeasured)
    } else {
        match ctx.axis.project(avg_color) {
            Some(t) => (t, WellStatus::Measured),
            None => (0.0, WellStatus::DegenerateCalibration),
        }
    };
    trace_debug!(
        "well",
        row = row,
        col = col,
        samples = pixels.len(),
        intensity = intensity
    );

    WellResult {
        id: well_label(row, col),
        row,
        col,
        center,
        avg_color,
        intensity,
        viability: intensity * 100.0,
        sample_count: pixels.len(),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::{analyze_plate, PlateRequest, WellStatus};
    use crate::color::Rgb;
    use crate::grid::{GridConfig, Point};
    use crate::image::OwnedRgbImage;
    use crate::util::{PlateLabError, Reference};

    fn request(grid: GridConfig, low: Point, high: Point) -> PlateRequest {
        PlateRequest {
            grid,
            rows: 2,
            cols: 3,
            reference_low: low,
            reference_high: high,
            row_concentrations: vec![1.0, 10.0],
            units: "uM".to_owned(),
        }
    }

    #[test]
    fn results_are_row_major_with_labels() {
        let img = OwnedRgbImage::filled(40, 30, Rgb::new(100, 100, 100)).unwrap();
        let grid = GridConfig::axis_aligned(Point::new(5.0, 5.0), 10.0, 10.0);
        let out = analyze_plate(&img, &request(grid, Point::new(5.0, 5.0), Point::new(15.0, 5.0)))
            .unwrap();

        let order: Vec<_> = out.wells.iter().map(|w| (w.row, w.col)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        let ids: Vec<_> = out.wells.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3", "B1", "B2", "B3"]);
        assert_eq!(out.well(1, 2).map(|w| w.center), Some(Point::new(25.0, 15.0)));
        assert!(out.well(2, 0).is_none());
    }

    #[test]
    fn uniform_image_is_degenerate_but_not_fatal() {
        let img = OwnedRgbImage::filled(40, 30, Rgb::new(100, 100, 100)).unwrap();
        let grid = GridConfig::axis_aligned(Point::new(5.0, 5.0), 10.0, 10.0);
        let out = analyze_plate(&img, &request(grid, Point::new(5.0, 5.0), Point::new(15.0, 5.0)))
            .unwrap();

        assert!(out.calibration.is_degenerate());
        assert!(out
            .wells
            .iter()
            .all(|w| w.status == WellStatus::DegenerateCalibration && w.intensity == 0.0));
        assert!(out.ic50().is_none());
    }

    #[test]
    fn reference_outside_the_image_is_fatal() {
        let img = OwnedRgbImage::filled(40, 30, Rgb::new(100, 100, 100)).unwrap();
        let grid = GridConfig::axis_aligned(Point::new(5.0, 5.0), 10.0, 10.0);
        let err = analyze_plate(
            &img,
            &request(grid, Point::new(5.0, 5.0), Point::new(500.0, 5.0)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PlateLabError::EmptyReferenceSample {
                reference: Reference::High
            }
        );
    }

    #[test]
    fn degenerate_grid_fails_before_sampling() {
        let img = OwnedRgbImage::filled(40, 30, Rgb::new(100, 100, 100)).unwrap();
        let grid = GridConfig::axis_aligned(Point::new(5.0, 5.0), 10.0, 0.0);
        // Both references are off-image too; the radius check must win.
        let err = analyze_plate(
            &img,
            &request(grid, Point::new(-50.0, 5.0), Point::new(500.0, 5.0)),
        )
        .unwrap_err();
        assert_eq!(err, PlateLabError::InvalidRadius { radius: 0.0 });
    }
}
