use criterion::{criterion_group, criterion_main, Criterion};
use platelab::lowlevel::{rgb_to_lab, robust_color, sample_disk};
use platelab::{
    AnalysisConfig, GridConfig, OwnedRgbImage, PlateAnalyzer, PlateRequest, Point, Rgb,
};
use std::hint::black_box;

fn make_plate(width: usize, height: usize) -> OwnedRgbImage {
    let mut img = OwnedRgbImage::filled(width, height, Rgb::BLACK).unwrap();
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            let g = ((x * 3) ^ (y * 5)) & 0xFF;
            let b = (x ^ y) & 0xFF;
            img.put(x, y, Rgb::new(r as u8, g as u8, b as u8));
        }
    }
    img
}

fn plate_96() -> PlateRequest {
    PlateRequest {
        grid: GridConfig::axis_aligned(Point::new(40.0, 40.0), 72.0, 72.0),
        rows: 8,
        cols: 12,
        reference_low: Point::new(40.0, 40.0),
        reference_high: Point::new(832.0, 544.0),
        row_concentrations: vec![0.0, 0.01, 0.1, 1.0, 10.0, 100.0, 1000.0, 10000.0],
        units: "nM".to_owned(),
    }
}

fn bench_analyze(c: &mut Criterion) {
    let img = make_plate(880, 600);
    let request = plate_96();

    let sequential = PlateAnalyzer::new();
    c.bench_function("analyze_96_well_sequential", |b| {
        b.iter(|| black_box(sequential.analyze(&img, &request).unwrap()));
    });

    let parallel = PlateAnalyzer::new().with_config(AnalysisConfig {
        parallel: true,
        ..AnalysisConfig::default()
    });
    c.bench_function("analyze_96_well_parallel", |b| {
        b.iter(|| black_box(parallel.analyze(&img, &request).unwrap()));
    });
}

fn bench_stages(c: &mut Criterion) {
    let img = make_plate(200, 200);
    let pixels = sample_disk(&img, Point::new(100.0, 100.0), 21.6);

    c.bench_function("sample_disk_r21", |b| {
        b.iter(|| black_box(sample_disk(&img, black_box(Point::new(100.0, 100.0)), 21.6)));
    });
    c.bench_function("robust_color_r21", |b| {
        b.iter(|| black_box(robust_color(black_box(&pixels))));
    });
    c.bench_function("rgb_to_lab", |b| {
        b.iter(|| black_box(rgb_to_lab(black_box(Rgb::new(181, 92, 37)))));
    });
}

criterion_group!(benches, bench_analyze, bench_stages);
criterion_main!(benches);
