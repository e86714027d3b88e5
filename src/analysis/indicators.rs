//! Moving-average style indicators over price series.
//!
//! The batch functions operate on whole slices; [`RollingMean`] and
//! [`IncrementalEma`] maintain state for one-value-at-a-time feeds (the
//! backtester drives those).

use super::errors::AnalysisError;

fn check_window(values: &[f64], window: usize) -> Result<(), AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::Validation("window must be positive".to_string()));
    }
    if values.len() < window {
        return Err(AnalysisError::InsufficientData(format!(
            "need at least {} values, got {}",
            window,
            values.len()
        )));
    }
    Ok(())
}

/// Simple moving average, valid mode: output has `len - window + 1` entries,
/// one per fully covered window.
pub fn sma(values: &[f64], window: usize) -> Result<Vec<f64>, AnalysisError> {
    check_window(values, window)?;

    let mut out = Vec::with_capacity(values.len() - window + 1);
    let mut sum: f64 = values[..window].iter().sum();
    out.push(sum / window as f64);

    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out.push(sum / window as f64);
    }

    Ok(out)
}

/// Exponential moving average, seeded with the SMA of the first window.
///
/// Output has the same length as the input; the first `window - 1` entries
/// hold the seed value so the series can be plotted against the prices.
pub fn ema(values: &[f64], window: usize) -> Result<Vec<f64>, AnalysisError> {
    check_window(values, window)?;

    let alpha = 2.0 / (window as f64 + 1.0);
    let seed: f64 = values[..window].iter().sum::<f64>() / window as f64;

    let mut out = vec![seed; window];
    let mut current = seed;

    for &price in &values[window..] {
        current = alpha * price + (1.0 - alpha) * current;
        out.push(current);
    }

    Ok(out)
}

/// MACD of two exponential moving averages. Returns
/// `(slow_ema, fast_ema, fast - slow)`.
pub fn macd(
    values: &[f64],
    slow_window: usize,
    fast_window: usize,
) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>), AnalysisError> {
    let slow = ema(values, slow_window)?;
    let fast = ema(values, fast_window)?;
    let diff = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    Ok((slow, fast, diff))
}

/// Relative strength index with Wilder smoothing.
///
/// Output has the same length as the input; the first `window` entries hold
/// the RSI of the seed period.
pub fn rsi(values: &[f64], window: usize) -> Result<Vec<f64>, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::Validation("window must be positive".to_string()));
    }
    if values.len() <= window + 1 {
        return Err(AnalysisError::InsufficientData(format!(
            "need more than {} values, got {}",
            window + 1,
            values.len()
        )));
    }

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let seed = &deltas[..window + 1];
    let mut up: f64 = seed.iter().filter(|&&d| d >= 0.0).sum::<f64>() / window as f64;
    let mut down: f64 = -seed.iter().filter(|&&d| d < 0.0).sum::<f64>() / window as f64;

    let mut out = vec![0.0; values.len()];
    let rs = up / down;
    let seed_rsi = 100.0 - 100.0 / (1.0 + rs);
    for slot in out.iter_mut().take(window) {
        *slot = seed_rsi;
    }

    for i in window..values.len() {
        let delta = deltas[i - 1];
        let (upval, downval) = if delta > 0.0 { (delta, 0.0) } else { (0.0, -delta) };

        up = (up * (window as f64 - 1.0) + upval) / window as f64;
        down = (down * (window as f64 - 1.0) + downval) / window as f64;

        let rs = up / down;
        out[i] = 100.0 - 100.0 / (1.0 + rs);
    }

    Ok(out)
}

/// Fixed-window rolling mean over a ring buffer.
///
/// Until the window fills, the mean covers only the slots seen so far; an
/// empty register reports 0.0.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    values: Vec<f64>,
    position: usize,
    filled: bool,
}

impl RollingMean {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: vec![0.0; window],
            position: 0,
            filled: false,
        }
    }

    /// Push a new value, evicting the oldest once the window is full.
    pub fn add(&mut self, value: f64) {
        self.values[self.position] = value;
        self.position = (self.position + 1) % self.window;
        if !self.filled && self.position == 0 {
            self.filled = true;
        }
    }

    /// Mean of the occupied slots, 0.0 when nothing has been added yet.
    pub fn mean(&self) -> f64 {
        let occupied = if self.filled { self.window } else { self.position };
        if occupied == 0 {
            return 0.0;
        }
        self.values[..occupied].iter().sum::<f64>() / occupied as f64
    }

    /// Whether the full window has been populated.
    pub fn is_ready(&self) -> bool {
        self.filled
    }
}

/// Incremental EMA that seeds itself with the SMA of the first `period`
/// values, then updates one price at a time.
#[derive(Debug, Clone)]
pub struct IncrementalEma {
    period: usize,
    alpha: f64,
    current: Option<f64>,
    count: usize,
    sum: f64,
}

impl IncrementalEma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            current: None,
            count: 0,
            sum: 0.0,
        }
    }

    /// Feed one price; returns the updated EMA once the seed period has
    /// filled.
    pub fn update(&mut self, price: f64) -> Option<f64> {
        self.count += 1;

        if self.count <= self.period {
            self.sum += price;
            if self.count == self.period {
                let seed = self.sum / self.period as f64;
                self.current = Some(seed);
                return Some(seed);
            }
            return None;
        }

        let previous = self.current?;
        let next = self.alpha * price + (1.0 - self.alpha) * previous;
        self.current = Some(next);
        Some(next)
    }

    pub fn value(&self) -> Option<f64> {
        self.current
    }

    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_valid_mode() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(sma(&values, 2).unwrap(), vec![1.5, 2.5, 3.5, 4.5]);
        assert_eq!(sma(&values, 5).unwrap(), vec![3.0]);
    }

    #[test]
    fn test_sma_window_errors() {
        assert!(matches!(sma(&[1.0], 0), Err(AnalysisError::Validation(_))));
        assert!(matches!(sma(&[1.0], 2), Err(AnalysisError::InsufficientData(_))));
    }

    #[test]
    fn test_ema_seed_and_length() {
        let values = [2.0, 4.0, 6.0, 8.0];
        let out = ema(&values, 2).unwrap();
        assert_eq!(out.len(), values.len());
        // Seed = mean of first two values
        assert_eq!(out[0], 3.0);
        assert_eq!(out[1], 3.0);
        // alpha = 2/3: 6*2/3 + 3/3 = 5, then 8*2/3 + 5/3 = 7
        assert!((out[2] - 5.0).abs() < 1e-12);
        assert!((out[3] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_macd_is_fast_minus_slow() {
        let values: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let (slow, fast, diff) = macd(&values, 10, 3).unwrap();
        for i in 0..values.len() {
            assert!((diff[i] - (fast[i] - slow[i])).abs() < 1e-12);
        }
        // On a rising series the fast EMA tracks price more closely
        assert!(diff[values.len() - 1] > 0.0);
    }

    #[test]
    fn test_rsi_bounds_and_direction() {
        let rising: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let out = rsi(&rising, 14).unwrap();
        assert_eq!(out.len(), rising.len());
        for &v in &out {
            assert!((0.0..=100.0).contains(&v), "rsi out of range: {}", v);
        }
        // Monotonic gains pin the RSI at the top of the range
        assert!(out[out.len() - 1] > 99.0);
    }

    #[test]
    fn test_rolling_mean_partial_fill() {
        let mut ma = RollingMean::new(3);
        assert_eq!(ma.mean(), 0.0);
        assert!(!ma.is_ready());

        ma.add(3.0);
        assert_eq!(ma.mean(), 3.0);

        ma.add(5.0);
        assert_eq!(ma.mean(), 4.0);

        ma.add(7.0);
        assert!(ma.is_ready());
        assert_eq!(ma.mean(), 5.0);

        // Eviction of the oldest value
        ma.add(9.0);
        assert_eq!(ma.mean(), 7.0);
    }

    #[test]
    fn test_incremental_ema_matches_batch() {
        let values = [2.0, 4.0, 6.0, 8.0];
        let batch = ema(&values, 2).unwrap();

        let mut inc = IncrementalEma::new(2);
        assert_eq!(inc.update(2.0), None);
        assert!(!inc.is_ready());
        assert_eq!(inc.update(4.0), Some(3.0));
        assert!(inc.is_ready());

        let third = inc.update(6.0).unwrap();
        let fourth = inc.update(8.0).unwrap();
        assert!((third - batch[2]).abs() < 1e-12);
        assert!((fourth - batch[3]).abs() < 1e-12);
    }
}
