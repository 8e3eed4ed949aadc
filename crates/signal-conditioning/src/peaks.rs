//! Local extrema detection

/// Indices strictly greater than both neighbours (endpoints excluded)
pub fn find_peaks(series: &[f64]) -> Vec<usize> {
    extrema(series, |prev, cur, next| cur > prev && cur > next)
}

/// Indices strictly less than both neighbours (endpoints excluded)
pub fn find_troughs(series: &[f64]) -> Vec<usize> {
    extrema(series, |prev, cur, next| cur < prev && cur < next)
}

/// Peaks whose value also exceeds `threshold`
pub fn peaks_above(series: &[f64], threshold: f64) -> Vec<usize> {
    extrema(series, |prev, cur, next| {
        cur > prev && cur > next && cur > threshold
    })
}

/// Gather series values at the given indices
pub fn values_at(series: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().filter_map(|&i| series.get(i).copied()).collect()
}

fn extrema(series: &[f64], keep: impl Fn(f64, f64, f64) -> bool) -> Vec<usize> {
    series
        .windows(3)
        .enumerate()
        .filter(|(_, w)| keep(w[0], w[1], w[2]))
        .map(|(i, _)| i + 1)
        .collect()
}
