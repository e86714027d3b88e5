//! Fetch OHLCV history from CryptoCompare and print it as CSV.
//!
//! Usage: fetch_history [fsym] [tsym] [limit] [hour|day] [aggregate]

use coinlab::api::CryptoCompareClient;
use coinlab::common::constants::{DEFAULT_EXCHANGE, DEFAULT_QUOTE, DEFAULT_SYMBOL};
use coinlab::logging::init_simple_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_simple_logging()?;

    let args: Vec<String> = std::env::args().collect();
    let fsym = args.get(1).map(String::as_str).unwrap_or(DEFAULT_SYMBOL);
    let tsym = args.get(2).map(String::as_str).unwrap_or(DEFAULT_QUOTE);
    let limit: u32 = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(30);
    let granularity = args.get(4).map(String::as_str).unwrap_or("hour");
    let aggregate: u32 = args.get(5).map(|s| s.parse()).transpose()?.unwrap_or(1);

    let mut client = CryptoCompareClient::new()?;

    let points = match granularity {
        "hour" => client.hourly_history(fsym, tsym, limit, aggregate, DEFAULT_EXCHANGE).await?,
        "day" => client.daily_history(fsym, tsym, limit, aggregate, DEFAULT_EXCHANGE).await?,
        other => return Err(format!("granularity must be \"hour\" or \"day\", got {}", other).into()),
    };

    println!("time,open,high,low,close,volumefrom,volumeto");
    for point in &points {
        println!(
            "{},{},{},{},{},{},{}",
            point.time,
            point.open,
            point.high,
            point.low,
            point.close,
            point.volumefrom,
            point.volumeto
        );
    }

    Ok(())
}
