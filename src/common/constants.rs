/// Time constants
pub const MILLISECONDS_PER_SECOND: i64 = 1000;
pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3600;
pub const SECONDS_PER_DAY: i64 = 86400;

// Tick file timestamp formats. Some exchange dumps carry fractional
// seconds, some don't, so the parser has to accept both.
pub const TICK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const TICK_TIME_FORMAT_FRACTIONAL: &str = "%Y-%m-%d %H:%M:%S%.f";

// API endpoints
pub const CRYPTOCOMPARE_BASE_URL: &str = "https://min-api.cryptocompare.com/data";
pub const BITTREX_BASE_URL: &str = "https://bittrex.com/api/v1.1";
pub const REDDIT_HOST: &str = "https://www.reddit.com";

// Reddit serves listing pages in fixed-size chunks
pub const REDDIT_PAGE_SIZE: u32 = 25;
pub const SCRAPER_USER_AGENT: &str = "coinlab-scraper-v1";

// Default values
pub const DEFAULT_SYMBOL: &str = "BTC";
pub const DEFAULT_QUOTE: &str = "USD";
pub const DEFAULT_EXCHANGE: &str = "CCCAGG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
