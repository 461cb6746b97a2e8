//! Circular-disk pixel sampling.

use super::PixelSource;
use crate::color::Rgb;
use crate::grid::Point;

/// Integer radius the sampler actually uses: `floor(radius)`, at least 1.
///
/// Returns `None` for a non-finite radius.
pub fn effective_radius(radius: f64) -> Option<i64> {
    if !radius.is_finite() {
        return None;
    }
    Some((radius.floor() as i64).max(1))
}

/// Collects every pixel whose centre lies within `radius` of `center`.
///
/// The radius is floored to an integer of at least 1. Pixels of the bounding
/// square `[center - r, center + r]` are kept when their Euclidean distance
/// to `center` is `<= r`. Out-of-bounds positions are skipped, so the result
/// may be shorter than a full disk or empty; it is never an error. Pixels are
/// returned in row-major order.
pub fn sample_disk<S>(image: &S, center: Point, radius: f64) -> Vec<Rgb>
where
    S: PixelSource + ?Sized,
{
    let mut out = Vec::new();
    visit_disk(image, center, radius, |px| out.push(px));
    out
}

/// Number of in-bounds pixels [`sample_disk`] would return.
pub fn disk_sample_count<S>(image: &S, center: Point, radius: f64) -> usize
where
    S: PixelSource + ?Sized,
{
    let mut count = 0usize;
    visit_disk(image, center, radius, |_| count += 1);
    count
}

fn visit_disk<S, F>(image: &S, center: Point, radius: f64, mut visit: F)
where
    S: PixelSource + ?Sized,
    F: FnMut(Rgb),
{
    let Some(r) = effective_radius(radius) else {
        return;
    };
    if !center.x.is_finite() || !center.y.is_finite() {
        return;
    }
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return;
    }
    let rf = r as f64;
    let r2 = rf * rf;

    let x0 = (center.x - rf).ceil().max(0.0);
    let y0 = (center.y - rf).ceil().max(0.0);
    let x1 = (center.x + rf).floor().min((width - 1) as f64);
    let y1 = (center.y + rf).floor().min((height - 1) as f64);
    if x0 > x1 || y0 > y1 {
        return;
    }

    for y in y0 as usize..=y1 as usize {
        let dy = y as f64 - center.y;
        for x in x0 as usize..=x1 as usize {
            let dx = x as f64 - center.x;
            if dx * dx + dy * dy > r2 {
                continue;
            }
            if let Some(px) = image.pixel(x, y) {
                visit(px);
            }
        }
    }
}
