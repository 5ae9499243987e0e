// ============================================================
// Layer 4 - Column Statistics
// ============================================================
// Order statistics shared by the preprocessor (median fill) and
// the `describe` command (per-feature summary table).
//
// Quantiles use linear interpolation between closest ranks,
// so the 50% quantile equals the median for both odd and even
// counts.

use serde::Serialize;

/// Linear-interpolated quantile of already sorted values.
/// Returns None for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos  = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo   = pos.floor() as usize;
    let hi   = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median of the given values; None when there are none.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, 0.5)
}

/// Summary of one feature column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub name:  String,
    pub count: usize,
    pub mean:  f64,
    /// Sample standard deviation (n - 1); 0 for a single value
    pub std:   f64,
    pub min:   f64,
    pub q25:   f64,
    pub q50:   f64,
    pub q75:   f64,
    pub max:   f64,
}

/// Summarise one column. Returns None for an empty column.
pub fn describe(name: &str, values: &[f64]) -> Option<FeatureSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n    = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std  = if values.len() > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    } else {
        0.0
    };

    Some(FeatureSummary {
        name:  name.to_string(),
        count: values.len(),
        mean,
        std,
        min:   sorted[0],
        q25:   quantile_sorted(&sorted, 0.25)?,
        q50:   quantile_sorted(&sorted, 0.5)?,
        q75:   quantile_sorted(&sorted, 0.75)?,
        max:   sorted[sorted.len() - 1],
    })
}
