//! Linear price predictors over an OHLCV export: a time-to-close
//! least-squares fit scored on a held-out split, and a lag-window
//! autoregressive model.
//!
//! Usage: regress <ohlcv.csv> [test_ratio] [lags]

use coinlab::analysis::{train_test_split, LagModel, LinearFit};
use coinlab::dataset::{read_ohlcv_file, OhlcvColumns, ReadOptions};
use coinlab::logging::init_simple_logging;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_simple_logging()?;

    let args: Vec<String> = std::env::args().collect();
    let path = args
        .get(1)
        .ok_or("usage: regress <ohlcv.csv> [test_ratio] [lags]")?;
    let test_ratio: f64 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(0.4);
    let lags: usize = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(6);

    let series = read_ohlcv_file(
        std::path::Path::new(path),
        &OhlcvColumns::default(),
        &ReadOptions::default(),
    )?;

    // Day index as the single predictor of the close price
    let xs: Vec<f64> = (0..series.len()).map(|i| i as f64).collect();
    let ((train_x, train_y), (test_x, test_y)) =
        train_test_split(&xs, &series.close, test_ratio)?;

    let fit = LinearFit::fit(&train_x, &train_y)?;
    println!("Linear Regression");
    println!("Slope:      {}", fit.slope);
    println!("Intercept:  {}", fit.intercept);
    println!("Test R^2:   {}", fit.r_squared(&test_x, &test_y)?);

    let model = LagModel::fit(&series.close, lags)?;
    println!();
    println!("Lag Model ({} lags)", lags);
    println!("Intercept:  {}", model.intercept);
    println!("R^2:        {}", model.r_squared(&series.close)?);

    if series.len() >= lags {
        let window = &series.close[series.len() - lags..];
        println!("Next close: {}", model.predict(window)?);
    }

    Ok(())
}
