//! Linear price predictors: a one-feature least-squares fit and a
//! lag-window autoregressive model solved via the normal equations.

use super::errors::AnalysisError;

/// Deterministic train/test split. Samples are spread over both partitions
/// by accumulating the test ratio, so the split is reproducible without a
/// seeded RNG and both partitions cover the whole time range.
pub fn train_test_split(
    xs: &[f64],
    ys: &[f64],
    test_ratio: f64,
) -> Result<((Vec<f64>, Vec<f64>), (Vec<f64>, Vec<f64>)), AnalysisError> {
    if xs.len() != ys.len() {
        return Err(AnalysisError::Validation(format!(
            "series lengths differ: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if !(0.0..1.0).contains(&test_ratio) {
        return Err(AnalysisError::Validation(format!(
            "test ratio must be in [0, 1), got {}",
            test_ratio
        )));
    }

    let mut train = (Vec::new(), Vec::new());
    let mut test = (Vec::new(), Vec::new());
    let mut acc = 0.0;

    for i in 0..xs.len() {
        acc += test_ratio;
        if acc >= 1.0 {
            acc -= 1.0;
            test.0.push(xs[i]);
            test.1.push(ys[i]);
        } else {
            train.0.push(xs[i]);
            train.1.push(ys[i]);
        }
    }

    Ok((train, test))
}

/// Ordinary least squares on a single predictor.
#[derive(Debug, Clone, Copy)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, AnalysisError> {
        if x.len() != y.len() {
            return Err(AnalysisError::Validation(format!(
                "series lengths differ: {} vs {}",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(AnalysisError::InsufficientData(
                "need at least 2 points to fit a line".to_string(),
            ));
        }

        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for i in 0..x.len() {
            let dx = x[i] - mean_x;
            covariance += dx * (y[i] - mean_y);
            variance += dx * dx;
        }

        if variance == 0.0 {
            return Err(AnalysisError::Validation(
                "predictor has zero variance".to_string(),
            ));
        }

        let slope = covariance / variance;
        Ok(Self { slope, intercept: mean_y - slope * mean_x })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Coefficient of determination against held-out data. A target with
    /// zero variance scores 0.0.
    pub fn r_squared(&self, x: &[f64], y: &[f64]) -> Result<f64, AnalysisError> {
        if x.len() != y.len() || x.is_empty() {
            return Err(AnalysisError::Validation(
                "scoring needs equal-length non-empty series".to_string(),
            ));
        }

        let mean_y = y.iter().sum::<f64>() / y.len() as f64;
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for i in 0..x.len() {
            let err = y[i] - self.predict(x[i]);
            ss_res += err * err;
            let dev = y[i] - mean_y;
            ss_tot += dev * dev;
        }

        if ss_tot == 0.0 {
            return Ok(0.0);
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}

/// Build the lag matrix for an autoregressive fit: each row holds `lags`
/// consecutive values and the target is the value that follows them.
pub fn lag_matrix(series: &[f64], lags: usize) -> Result<(Vec<Vec<f64>>, Vec<f64>), AnalysisError> {
    if lags == 0 {
        return Err(AnalysisError::Validation("lags must be positive".to_string()));
    }
    if series.len() <= lags {
        return Err(AnalysisError::InsufficientData(format!(
            "need more than {} values, got {}",
            lags,
            series.len()
        )));
    }

    let mut rows = Vec::with_capacity(series.len() - lags);
    let mut targets = Vec::with_capacity(series.len() - lags);
    for i in 0..series.len() - lags {
        rows.push(series[i..i + lags].to_vec());
        targets.push(series[i + lags]);
    }

    Ok((rows, targets))
}

/// Gaussian elimination with partial pivoting. `matrix` is consumed.
fn solve_linear_system(
    mut matrix: Vec<Vec<f64>>,
    mut rhs: Vec<f64>,
) -> Result<Vec<f64>, AnalysisError> {
    let n = rhs.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&a, &b| {
                matrix[a][col]
                    .abs()
                    .partial_cmp(&matrix[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        if matrix[pivot][col].abs() < 1e-12 {
            return Err(AnalysisError::Validation(
                "singular system: lag features are linearly dependent".to_string(),
            ));
        }

        matrix.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let mut value = rhs[row];
        for col in row + 1..n {
            value -= matrix[row][col] * solution[col];
        }
        solution[row] = value / matrix[row][row];
    }

    Ok(solution)
}

/// Autoregressive linear model over a window of trailing values.
#[derive(Debug, Clone)]
pub struct LagModel {
    pub lags: usize,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LagModel {
    /// Fit by solving the normal equations of the lag matrix (with a bias
    /// column).
    pub fn fit(series: &[f64], lags: usize) -> Result<Self, AnalysisError> {
        let (rows, targets) = lag_matrix(series, lags)?;
        let width = lags + 1; // bias term first

        // Normal equations: (X'X) beta = X'y
        let mut xtx = vec![vec![0.0; width]; width];
        let mut xty = vec![0.0; width];

        for (row, &target) in rows.iter().zip(&targets) {
            let mut features = Vec::with_capacity(width);
            features.push(1.0);
            features.extend_from_slice(row);

            for i in 0..width {
                xty[i] += features[i] * target;
                for j in 0..width {
                    xtx[i][j] += features[i] * features[j];
                }
            }
        }

        let beta = solve_linear_system(xtx, xty)?;

        Ok(Self {
            lags,
            intercept: beta[0],
            coefficients: beta[1..].to_vec(),
        })
    }

    /// Predict the value following a window of `lags` trailing values.
    pub fn predict(&self, window: &[f64]) -> Result<f64, AnalysisError> {
        if window.len() != self.lags {
            return Err(AnalysisError::Validation(format!(
                "window length {} does not match {} lags",
                window.len(),
                self.lags
            )));
        }

        let mut value = self.intercept;
        for i in 0..self.lags {
            value += self.coefficients[i] * window[i];
        }
        Ok(value)
    }

    /// One-step-ahead predictions over a series, aligned with the targets
    /// of [`lag_matrix`].
    pub fn predict_series(&self, series: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        let (rows, _) = lag_matrix(series, self.lags)?;
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Coefficient of determination of one-step-ahead predictions.
    pub fn r_squared(&self, series: &[f64]) -> Result<f64, AnalysisError> {
        let (rows, targets) = lag_matrix(series, self.lags)?;

        let mean = targets.iter().sum::<f64>() / targets.len() as f64;
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (row, &target) in rows.iter().zip(&targets) {
            let err = target - self.predict(row)?;
            ss_res += err * err;
            let dev = target - mean;
            ss_tot += dev * dev;
        }

        if ss_tot == 0.0 {
            return Ok(0.0);
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}
