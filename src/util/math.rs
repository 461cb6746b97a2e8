//! Small numeric helpers shared by the estimators.

/// Median of `values`, averaging the two central order statistics for even
/// lengths. Sorts the slice in place. Returns `None` for an empty slice.
pub(crate) fn median_in_place(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) * 0.5)
    } else {
        Some(values[mid])
    }
}

/// Dot product of two 3-vectors.
#[inline]
pub(crate) fn dot3(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Componentwise `a - b`.
#[inline]
pub(crate) fn sub3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[cfg(test)]
mod tests {
    use super::{dot3, median_in_place, sub3};

    #[test]
    fn median_handles_odd_and_even_lengths() {
        let mut odd = [5.0, 1.0, 3.0];
        assert_eq!(median_in_place(&mut odd), Some(3.0));

        let mut even = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(median_in_place(&mut even), Some(2.5));

        let mut empty: [f64; 0] = [];
        assert_eq!(median_in_place(&mut empty), None);
    }

    #[test]
    fn vector_helpers_match_hand_computation() {
        let d = sub3([3.0, 2.0, 1.0], [1.0, 1.0, 1.0]);
        assert_eq!(d, [2.0, 1.0, 0.0]);
        assert!((dot3(d, [1.0, 2.0, 3.0]) - 4.0).abs() < 1e-12);
    }
}
