//! Linear-interpolation percentile.

/// Percentile of `values` using linear interpolation between closest ranks.
///
/// For `n` sorted values the rank is `pct / 100 * (n - 1)`; a fractional rank
/// interpolates between its two neighbours. `pct` is clamped to `0..=100`.
/// Returns `None` for an empty slice.
pub fn percentile(values: &[f32], pct: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted: Vec<f64> = values.iter().map(|v| f64::from(*v)).collect();
    sorted.sort_by(f64::total_cmp);

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
