use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Timestamp parse error: {0}")]
    TimestampParse(String),
    #[error("Price parse error: {0}")]
    PriceParse(#[from] std::num::ParseFloatError),
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),
}
