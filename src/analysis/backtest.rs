//! Moving-average crossover simulation and the buy-and-hold baseline.
//!
//! The crossover strategy starts fully invested at the first price, sells
//! the whole position when the short average drops below the long one and
//! buys back when it crosses above again, then liquidates at the final
//! price.

use tracing::debug;

use super::errors::AnalysisError;
use super::indicators::{IncrementalEma, RollingMean};

/// Which moving average family drives the crossover signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaType {
    Simple,
    Exponential,
}

impl MaType {
    pub fn parse(value: &str) -> Result<Self, AnalysisError> {
        match value.to_lowercase().as_str() {
            "simple" => Ok(MaType::Simple),
            "exponential" => Ok(MaType::Exponential),
            other => Err(AnalysisError::Validation(format!(
                "ma type must be \"simple\" or \"exponential\", got {}",
                other
            ))),
        }
    }
}

/// Outcome of one simulated strategy run.
#[derive(Debug, Clone, Copy)]
pub struct BacktestReport {
    pub initial_investment: f64,
    pub final_value: f64,
}

impl BacktestReport {
    fn new(initial_investment: f64, final_value: f64) -> Self {
        Self { initial_investment, final_value }
    }

    pub fn absolute_return(&self) -> f64 {
        self.final_value - self.initial_investment
    }

    pub fn relative_return_pct(&self) -> f64 {
        self.absolute_return() / self.initial_investment * 100.0
    }
}

impl std::fmt::Display for BacktestReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Initial Investment: {:.2}", self.initial_investment)?;
        writeln!(f, "Ending Investment:  {:.2}", self.final_value)?;
        writeln!(f, "Absolute Returns:   {:.2}", self.absolute_return())?;
        write!(f, "Relative Returns:   %{:.2}", self.relative_return_pct())
    }
}

enum Signal {
    Sma(RollingMean, RollingMean),
    Ema(IncrementalEma, IncrementalEma),
}

impl Signal {
    fn new(short_window: usize, long_window: usize, ma_type: MaType) -> Self {
        match ma_type {
            MaType::Simple => Signal::Sma(
                RollingMean::new(short_window),
                RollingMean::new(long_window),
            ),
            MaType::Exponential => Signal::Ema(
                IncrementalEma::new(short_window),
                IncrementalEma::new(long_window),
            ),
        }
    }

    /// Feed one price and return short-minus-long once both averages are
    /// warmed up.
    fn update(&mut self, price: f64) -> Option<f64> {
        match self {
            Signal::Sma(short, long) => {
                short.add(price);
                long.add(price);
                if long.is_ready() {
                    Some(short.mean() - long.mean())
                } else {
                    None
                }
            }
            Signal::Ema(short, long) => {
                let s = short.update(price);
                let l = long.update(price);
                match (s, l) {
                    (Some(s), Some(l)) => Some(s - l),
                    _ => None,
                }
            }
        }
    }
}

fn validate_prices(prices: &[f64], investment: f64) -> Result<(), AnalysisError> {
    if prices.len() < 2 {
        return Err(AnalysisError::InsufficientData(
            "need at least 2 prices to simulate".to_string(),
        ));
    }
    if prices.iter().any(|&p| p <= 0.0) {
        return Err(AnalysisError::Validation(
            "prices must be strictly positive".to_string(),
        ));
    }
    if investment <= 0.0 {
        return Err(AnalysisError::Validation(
            "investment must be strictly positive".to_string(),
        ));
    }
    Ok(())
}

/// Simulate the moving-average crossover strategy.
pub fn simulate_crossover(
    prices: &[f64],
    short_window: usize,
    long_window: usize,
    ma_type: MaType,
    investment: f64,
) -> Result<BacktestReport, AnalysisError> {
    validate_prices(prices, investment)?;
    if short_window == 0 || long_window == 0 {
        return Err(AnalysisError::Validation("windows must be positive".to_string()));
    }
    if short_window >= long_window {
        return Err(AnalysisError::Validation(format!(
            "short window {} must be below long window {}",
            short_window, long_window
        )));
    }
    if prices.len() < long_window {
        return Err(AnalysisError::InsufficientData(format!(
            "need at least {} prices for the long window, got {}",
            long_window,
            prices.len()
        )));
    }

    let mut signal = Signal::new(short_window, long_window, ma_type);

    // Invested from day one
    let mut coins = investment / prices[0];
    let mut cash = 0.0;
    let mut holding = true;
    let mut trades = 0u32;

    for &price in prices {
        let Some(diff) = signal.update(price) else {
            continue;
        };

        if diff < 0.0 && holding {
            cash = coins * price;
            coins = 0.0;
            holding = false;
            trades += 1;
            debug!("📉 Crossover sell at {:.4}", price);
        } else if diff > 0.0 && !holding {
            coins = cash / price;
            cash = 0.0;
            holding = true;
            trades += 1;
            debug!("📈 Crossover buy at {:.4}", price);
        }
    }

    let final_value = if holding {
        coins * prices[prices.len() - 1]
    } else {
        cash
    };

    debug!("Crossover run finished with {} trades", trades);

    Ok(BacktestReport::new(investment, final_value))
}

/// Buy at the first price, sell at the last.
pub fn buy_and_hold(prices: &[f64], investment: f64) -> Result<BacktestReport, AnalysisError> {
    validate_prices(prices, investment)?;

    let final_value = investment / prices[0] * prices[prices.len() - 1];
    Ok(BacktestReport::new(investment, final_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_and_hold_doubles() {
        let prices = [10.0, 12.0, 20.0];
        let report = buy_and_hold(&prices, 1000.0).unwrap();
        assert_eq!(report.final_value, 2000.0);
        assert_eq!(report.absolute_return(), 1000.0);
        assert_eq!(report.relative_return_pct(), 100.0);
    }

    #[test]
    fn test_crossover_round_trip() {
        // With windows (1, 2) the signal is the sign of the last move:
        // sell at the drop to 10, buy back at the rise to 20.
        let prices = [10.0, 20.0, 10.0, 20.0];
        let report = simulate_crossover(&prices, 1, 2, MaType::Simple, 1000.0).unwrap();

        // coins = 100; sell at 10 -> 1000 cash; buy at 20 -> 50 coins;
        // final = 50 * 20 = 1000
        assert!((report.final_value - 1000.0).abs() < 1e-9);
        assert_eq!(report.relative_return_pct(), 0.0);

        // Buy and hold doubles over the same series
        let baseline = buy_and_hold(&prices, 1000.0).unwrap();
        assert_eq!(baseline.final_value, 2000.0);
    }

    #[test]
    fn test_crossover_rising_market_matches_hold() {
        // Short MA stays above long MA on a strictly rising series, so the
        // position is never sold
        let prices: Vec<f64> = (1..=30).map(|i| 100.0 + i as f64).collect();
        let strategy = simulate_crossover(&prices, 3, 10, MaType::Simple, 500.0).unwrap();
        let hold = buy_and_hold(&prices, 500.0).unwrap();
        assert!((strategy.final_value - hold.final_value).abs() < 1e-9);
    }

    #[test]
    fn test_crossover_exponential_runs() {
        let prices: Vec<f64> = (0..40)
            .map(|i| 100.0 + 10.0 * ((i as f64) * 0.5).sin())
            .collect();
        let report = simulate_crossover(&prices, 5, 20, MaType::Exponential, 1000.0).unwrap();
        assert!(report.final_value > 0.0);
    }

    #[test]
    fn test_crossover_window_validation() {
        let prices = [10.0, 11.0, 12.0];
        assert!(matches!(
            simulate_crossover(&prices, 5, 2, MaType::Simple, 100.0),
            Err(AnalysisError::Validation(_))
        ));
        assert!(matches!(
            simulate_crossover(&prices, 2, 10, MaType::Simple, 100.0),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_ma_type_parse() {
        assert_eq!(MaType::parse("Simple").unwrap(), MaType::Simple);
        assert_eq!(MaType::parse("EXPONENTIAL").unwrap(), MaType::Exponential);
        assert!(MaType::parse("hull").is_err());
    }

    #[test]
    fn test_report_display() {
        let report = BacktestReport::new(10000.0, 12500.0);
        let rendered = report.to_string();
        assert!(rendered.contains("Initial Investment: 10000.00"));
        assert!(rendered.contains("Ending Investment:  12500.00"));
        assert!(rendered.contains("Absolute Returns:   2500.00"));
        assert!(rendered.contains("%25.00"));
    }
}
