//! Count new posts per day in a subreddit and print a two-column report.
//!
//! Usage: reddit_posts [subreddit] [pages]

use coinlab::logging::init_simple_logging;
use coinlab::scrape::reddit::sorted_counts;
use coinlab::scrape::{RedditScraper, ScrapeOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_simple_logging()?;

    let args: Vec<String> = std::env::args().collect();
    let subreddit = args.get(1).map(String::as_str).unwrap_or("Bitcoin");
    let pages: u32 = args
        .get(2)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(ScrapeOptions::default().pages);

    let scraper = RedditScraper::new()?;
    let options = ScrapeOptions { pages, ..ScrapeOptions::default() };

    let counts = scraper.post_counts(subreddit, &options).await?;

    for (date, count) in sorted_counts(&counts) {
        println!("{} {}", date.format("%Y-%m-%d"), count);
    }

    Ok(())
}
