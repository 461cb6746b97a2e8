//! Rayon-parallel well measurement (feature-gated).

use super::{measure_well, WellContext, WellResult};
use crate::image::PixelSource;
use rayon::prelude::*;

/// Measures all wells on the rayon pool.
///
/// Wells are indexed row-major and the indexed collect keeps that order, so
/// the output matches the sequential loop element for element.
pub(crate) fn measure_wells_par<S>(
    image: &S,
    ctx: &WellContext,
    rows: usize,
    cols: usize,
) -> Vec<WellResult>
where
    S: PixelSource + Sync + ?Sized,
{
    if cols == 0 {
        return Vec::new();
    }
    (0..rows * cols)
        .into_par_iter()
        .map(|idx| measure_well(image, ctx, idx / cols, idx % cols))
        .collect()
}
