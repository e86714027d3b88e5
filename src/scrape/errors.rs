use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Retries exhausted: {0}")]
    RetriesExhausted(String),
}
