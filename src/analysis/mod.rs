pub mod backtest;
pub mod correlation;
pub mod errors;
pub mod indicators;
pub mod regression;

pub use backtest::{buy_and_hold, simulate_crossover, BacktestReport, MaType};
pub use correlation::{correlation_range, lagged_correlation, pearson, percent_change};
pub use errors::AnalysisError;
pub use indicators::{ema, macd, rsi, sma, IncrementalEma, RollingMean};
pub use regression::{train_test_split, LagModel, LinearFit};
