//! Poll Bittrex market summaries on an interval and append each snapshot
//! to a CSV file.
//!
//! Usage: market_watch [output.csv] [poll_seconds]

use std::io::Write;

use chrono::Utc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use coinlab::api::BittrexClient;
use coinlab::logging::init_simple_logging;

fn append_snapshot(
    path: &str,
    summaries: &[coinlab::api::MarketSummary],
) -> Result<(), std::io::Error> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let snapshot_time = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    for summary in summaries {
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            snapshot_time,
            summary.market_name,
            summary.last,
            summary.open_buy_orders,
            summary.open_sell_orders,
            summary.volume,
            summary.time_stamp
        )?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_simple_logging()?;

    let args: Vec<String> = std::env::args().collect();
    let output = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "market_summaries.csv".to_string());
    let poll_seconds: u64 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(30);

    let client = BittrexClient::new()?;

    info!("👀 Watching BTC markets, appending to {} every {}s", output, poll_seconds);

    loop {
        match client.market_summaries().await {
            Ok(summaries) => {
                append_snapshot(&output, &summaries)?;
                info!("Recorded {} markets at {}", summaries.len(), Utc::now());
            }
            Err(e) => error!("Summary poll failed: {}", e),
        }

        sleep(Duration::from_secs(poll_seconds)).await;
    }
}
