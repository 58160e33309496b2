//! Column normalization for the view layer
//!
//! Min-max scaling to [0,1] with the degenerate cases pinned to the neutral
//! midpoint: an all-missing or constant column normalizes to 0.5 everywhere
//! instead of propagating a division by zero.

/// Normalize one column. Missing (non-finite) entries stay missing unless the
/// whole column is degenerate, in which case every entry becomes 0.5.
pub fn robust_normalize(values: &[f64]) -> Vec<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return vec![0.5; values.len()];
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![0.5; values.len()];
    }
    values
        .iter()
        .map(|&v| {
            if v.is_finite() {
                (v - min) / (max - min)
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Mean over the finite entries, or `None` if there are none.
pub fn finite_mean(values: &[f64]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in values {
        if v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}
