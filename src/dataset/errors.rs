use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Date parse error: {0}")]
    DateParse(String),
    #[error("Number parse error: {0}")]
    FloatParse(#[from] std::num::ParseFloatError),
    #[error("Number parse error: {0}")]
    IntParse(#[from] std::num::ParseIntError),
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}
