//! Moving-average crossover backtest over an OHLCV export.
//!
//! Usage: backtest <ohlcv.csv> [short] [long] [simple|exponential] [investment]

use coinlab::analysis::{buy_and_hold, simulate_crossover, MaType};
use coinlab::dataset::{read_ohlcv_file, OhlcvColumns, ReadOptions};
use coinlab::logging::init_simple_logging;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_simple_logging()?;

    let args: Vec<String> = std::env::args().collect();
    let path = args
        .get(1)
        .ok_or("usage: backtest <ohlcv.csv> [short] [long] [simple|exponential] [investment]")?;
    let short_window: usize = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(5);
    let long_window: usize = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(20);
    let ma_type = MaType::parse(args.get(4).map(String::as_str).unwrap_or("exponential"))?;
    let investment: f64 = args.get(5).map(|s| s.parse()).transpose()?.unwrap_or(10_000.0);

    let series = read_ohlcv_file(
        std::path::Path::new(path),
        &OhlcvColumns::default(),
        &ReadOptions::default(),
    )?;

    let crossover = simulate_crossover(
        &series.close,
        short_window,
        long_window,
        ma_type,
        investment,
    )?;
    println!("Moving Average Strategy");
    println!("{}", crossover);

    let hold = buy_and_hold(&series.close, investment)?;
    println!();
    println!("Buy and Hold Strategy");
    println!("{}", hold);

    Ok(())
}
