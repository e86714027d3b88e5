//! Cross-series correlation with time lags.
//!
//! Used to compare price series against each other and against community
//! growth counts after normalizing both to percent change.

use super::errors::AnalysisError;

// Guards the percent-change division against flat-zero inputs
const ZERO_EPSILON: f64 = 1e-10;

/// Pearson correlation coefficient between two equal-length series.
///
/// Returns NaN when either series has zero variance.
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64, AnalysisError> {
    if a.len() != b.len() {
        return Err(AnalysisError::Validation(format!(
            "series lengths differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.len() < 2 {
        return Err(AnalysisError::InsufficientData(
            "need at least 2 points for correlation".to_string(),
        ));
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for i in 0..a.len() {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        covariance += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    Ok(covariance / (var_a.sqrt() * var_b.sqrt()))
}

/// Correlation of `a` shifted forward by `lag` against the head of `b`.
pub fn lagged_correlation(a: &[f64], b: &[f64], lag: usize) -> Result<f64, AnalysisError> {
    if lag >= a.len() || lag >= b.len() {
        return Err(AnalysisError::InsufficientData(format!(
            "lag {} exceeds series length",
            lag
        )));
    }
    pearson(&a[lag..], &b[..b.len() - lag])
}

/// Correlations for every lag in `-lag_range..=lag_range`, ordered most
/// negative to most positive. Negative lags shift `b` instead of `a`.
pub fn correlation_range(
    a: &[f64],
    b: &[f64],
    lag_range: usize,
) -> Result<Vec<f64>, AnalysisError> {
    if lag_range == 0 {
        return Ok(vec![pearson(a, b)?]);
    }

    let mut out = Vec::with_capacity(lag_range * 2 + 1);

    for lag in (1..=lag_range).rev() {
        out.push(lagged_correlation(b, a, lag)?);
    }
    for lag in 0..=lag_range {
        out.push(lagged_correlation(a, b, lag)?);
    }

    Ok(out)
}

/// First differences of a series.
pub fn change(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Relative first differences. Zero values are clamped to a tiny epsilon so
/// flat-zero series don't divide by zero.
pub fn percent_change(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| {
            let base = if w[0] == 0.0 { ZERO_EPSILON } else { w[0] };
            (w[1] - w[0]) / base.abs()
        })
        .collect()
}

/// Pair each correlation with its lag and sort by absolute correlation,
/// strongest first.
pub fn rank_by_magnitude(correlations: &[f64], lag_range: usize) -> Vec<(i64, f64)> {
    let mut ranked: Vec<(i64, f64)> = correlations
        .iter()
        .enumerate()
        .map(|(i, &c)| (i as i64 - lag_range as i64, c))
        .collect();

    ranked.sort_by(|x, y| {
        y.1.abs()
            .partial_cmp(&x.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
}
