//! Lagged correlation between two price series, optionally against a
//! community growth count file.
//!
//! Usage: correlate <ohlcv_a.csv> <ohlcv_b.csv> [lag_range] [counts.csv]

use coinlab::analysis::correlation::{correlation_range, percent_change, rank_by_magnitude};
use coinlab::dataset::{read_count_file, read_ohlcv_file, OhlcvColumns, ReadOptions};
use coinlab::logging::init_simple_logging;

fn print_ranked(title: &str, correlations: &[f64], lag_range: usize) {
    println!("{}", title);
    for (lag, correlation) in rank_by_magnitude(correlations, lag_range) {
        println!("Lag: {}\tCorrelation: {}", lag, correlation);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_simple_logging()?;

    let args: Vec<String> = std::env::args().collect();
    let path_a = args
        .get(1)
        .ok_or("usage: correlate <ohlcv_a.csv> <ohlcv_b.csv> [lag_range] [counts.csv]")?;
    let path_b = args
        .get(2)
        .ok_or("usage: correlate <ohlcv_a.csv> <ohlcv_b.csv> [lag_range] [counts.csv]")?;
    let lag_range: usize = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(10);

    let columns = OhlcvColumns::default();
    let options = ReadOptions::default();

    let series_a = read_ohlcv_file(std::path::Path::new(path_a), &columns, &options)?;
    let series_b = read_ohlcv_file(std::path::Path::new(path_b), &columns, &options)?;

    // Both series must cover the same time interval for this to make sense
    let a_change = percent_change(&series_a.open);
    let b_change = percent_change(&series_b.open);

    let correlations = correlation_range(&a_change, &b_change, lag_range)?;
    print_ranked(&format!("{} v. {}", path_a, path_b), &correlations, lag_range);

    if let Some(counts_path) = args.get(4) {
        let counts = read_count_file(std::path::Path::new(counts_path), &ReadOptions::counts())?;
        let counts_change = percent_change(&counts.counts_f64());

        let correlations = correlation_range(&a_change, &counts_change, lag_range)?;
        println!();
        print_ranked(
            &format!("{} v. {}", path_a, counts_path),
            &correlations,
            lag_range,
        );
    }

    Ok(())
}
