use clap::Parser;
use platelab::io::load_rgb_image;
use platelab::{
    AnalysisConfig, DosePoint, GridConfig, PlateAnalysis, PlateAnalyzer, PlateRequest, Point,
    ReferenceSample, Rgb, WellResult,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Platelab CLI: plate viability and IC50 (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
struct PointJson {
    x: f64,
    y: f64,
}

impl From<PointJson> for Point {
    fn from(value: PointJson) -> Self {
        Point::new(value.x, value.y)
    }
}

impl From<Point> for PointJson {
    fn from(value: Point) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GridJson {
    origin: PointJson,
    u: PointJson,
    v: PointJson,
}

impl From<&GridJson> for GridConfig {
    fn from(value: &GridJson) -> Self {
        GridConfig::new(value.origin.into(), value.u.into(), value.v.into())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AnalysisConfigJson {
    radius_factor: f64,
    parallel: bool,
}

impl Default for AnalysisConfigJson {
    fn default() -> Self {
        let cfg = AnalysisConfig::default();
        Self {
            radius_factor: cfg.radius_factor,
            parallel: cfg.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    output_path: Option<String>,
    csv_path: Option<String>,
    grid: GridJson,
    rows: usize,
    cols: usize,
    reference_low: PointJson,
    reference_high: PointJson,
    row_concentrations: Vec<f64>,
    units: String,
    analysis: AnalysisConfigJson,
}

#[derive(Debug, Serialize)]
struct ColorRecord {
    hex: String,
    rgb: [u8; 3],
}

impl From<Rgb> for ColorRecord {
    fn from(value: Rgb) -> Self {
        Self {
            hex: value.to_hex(),
            rgb: value.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReferenceRecord {
    point: PointJson,
    color: ColorRecord,
    samples: usize,
}

impl From<ReferenceSample> for ReferenceRecord {
    fn from(value: ReferenceSample) -> Self {
        Self {
            point: value.point.into(),
            color: value.color.into(),
            samples: value.sample_count,
        }
    }
}

#[derive(Debug, Serialize)]
struct WellRecord {
    id: String,
    row: usize,
    col: usize,
    center: PointJson,
    color: ColorRecord,
    intensity: f64,
    viability: f64,
    samples: usize,
    status: &'static str,
}

impl From<&WellResult> for WellRecord {
    fn from(value: &WellResult) -> Self {
        Self {
            id: value.id.clone(),
            row: value.row,
            col: value.col,
            center: value.center.into(),
            color: value.avg_color.into(),
            intensity: value.intensity,
            viability: value.viability,
            samples: value.sample_count,
            status: value.status.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoseRecord {
    concentration: f64,
    viability: f64,
}

impl From<&DosePoint> for DoseRecord {
    fn from(value: &DosePoint) -> Self {
        Self {
            concentration: value.concentration,
            viability: value.viability,
        }
    }
}

#[derive(Debug, Serialize)]
struct Ic50Record {
    value: f64,
    units: String,
}

#[derive(Debug, Serialize)]
struct Output {
    radius: f64,
    reference_low: ReferenceRecord,
    reference_high: ReferenceRecord,
    degenerate_calibration: bool,
    wells: Vec<WellRecord>,
    dose_points: Vec<DoseRecord>,
    ic50: Option<Ic50Record>,
    ic50_note: Option<String>,
}

impl From<&PlateAnalysis> for Output {
    fn from(value: &PlateAnalysis) -> Self {
        Self {
            radius: value.radius,
            reference_low: value.reference_low.into(),
            reference_high: value.reference_high.into(),
            degenerate_calibration: value.calibration.is_degenerate(),
            wells: value.wells.iter().map(WellRecord::from).collect(),
            dose_points: value.dose_points.iter().map(DoseRecord::from).collect(),
            ic50: value.ic50().map(|ic50| Ic50Record {
                value: ic50.value,
                units: ic50.units.clone(),
            }),
            ic50_note: value.ic50_unavailable().map(|reason| reason.to_string()),
        }
    }
}

fn wells_csv(wells: &[WellResult]) -> String {
    let mut out = String::from("id,row,col,x,y,hex,r,g,b,intensity,viability,samples,status\n");
    for w in wells {
        let c = w.avg_color;
        out.push_str(&format!(
            "{},{},{},{:.2},{:.2},{},{},{},{},{:.4},{:.2},{},{}\n",
            w.id,
            w.row,
            w.col,
            w.center.x,
            w.center.y,
            c.to_hex(),
            c.r,
            c.g,
            c.b,
            w.intensity,
            w.viability,
            w.sample_count,
            w.status.as_str()
        ));
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("platelab=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }
    if config.rows == 0 || config.cols == 0 {
        return Err("rows and cols must be at least 1".into());
    }
    if config.row_concentrations.len() > config.rows {
        tracing::warn!(
            rows = config.rows,
            concentrations = config.row_concentrations.len(),
            "ignoring concentrations beyond the last row"
        );
    }

    let image = load_rgb_image(&config.image_path)?;
    let request = PlateRequest {
        grid: GridConfig::from(&config.grid),
        rows: config.rows,
        cols: config.cols,
        reference_low: config.reference_low.into(),
        reference_high: config.reference_high.into(),
        row_concentrations: config.row_concentrations,
        units: config.units,
    };
    let analyzer = PlateAnalyzer::new().with_config(AnalysisConfig {
        radius_factor: config.analysis.radius_factor,
        parallel: config.analysis.parallel,
    });
    let analysis = analyzer.analyze(&image, &request)?;

    if let Some(path) = &config.csv_path {
        fs::write(path, wells_csv(&analysis.wells))?;
    }

    let output = Output::from(&analysis);
    let json = serde_json::to_string_pretty(&output)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{wells_csv, Config};
    use platelab::{Point, Rgb, WellResult, WellStatus};

    #[test]
    fn example_config_parses() {
        let config: Config = serde_json::from_str(super::EXAMPLE_JSON).unwrap();
        assert_eq!(config.rows, 8);
        assert_eq!(config.cols, 12);
        assert_eq!(config.row_concentrations.len(), 8);
        assert!((config.analysis.radius_factor - 0.3).abs() < 1e-12);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"image_path": "p.png"}"#).unwrap();
        assert!(!config.analysis.parallel);
        assert!((config.analysis.radius_factor - platelab::DEFAULT_RADIUS_FACTOR).abs() < 1e-12);
        assert!(config.output_path.is_none());
    }

    #[test]
    fn csv_has_one_line_per_well() {
        let wells = vec![WellResult {
            id: "A1".to_owned(),
            row: 0,
            col: 0,
            center: Point::new(10.0, 12.5),
            avg_color: Rgb::new(255, 0, 16),
            intensity: 0.5,
            viability: 50.0,
            sample_count: 29,
            status: WellStatus::Measured,
        }];
        let csv = wells_csv(&wells);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "A1,0,0,10.00,12.50,#ff0010,255,0,16,0.5000,50.00,29,measured");
    }
}
