pub mod bittrex;
pub mod cryptocompare;
pub mod errors;

pub use bittrex::{BittrexClient, MarketSummary};
pub use cryptocompare::{CryptoCompareClient, HistoPoint};
pub use errors::ApiError;
