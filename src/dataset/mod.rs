//! Readers for the delimited market-data exports the analysis tools consume.
//!
//! Two shapes show up in practice: full OHLCV dumps (coinmarketcap-style,
//! semicolon-delimited, newest row first) and simple two-column date/count
//! files (subreddit subscriber exports). Both readers abort on the first
//! malformed row.

pub mod errors;

pub use errors::DatasetError;

use std::path::Path;

use chrono::NaiveDate;

/// Column indices of the OHLCV fields inside a delimited export.
#[derive(Debug, Clone, Copy)]
pub struct OhlcvColumns {
    pub date: usize,
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    pub volume: usize,
}

impl Default for OhlcvColumns {
    fn default() -> Self {
        Self { date: 0, open: 1, high: 2, low: 3, close: 4, volume: 5 }
    }
}

/// Options shared by the file readers.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// chrono format of the date column
    pub date_format: String,
    /// Whether the file starts with a header row
    pub has_header: bool,
    /// Reverse rows after reading (for newest-first dumps)
    pub reverse: bool,
    /// Keep only the last N rows (after any reversal)
    pub num_rows: Option<usize>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            date_format: "%d/%m/%Y".to_string(),
            has_header: true,
            reverse: true,
            num_rows: None,
        }
    }
}

impl ReadOptions {
    /// Defaults for two-column date/count files: comma-delimited, ISO
    /// dates, already oldest-first.
    pub fn counts() -> Self {
        Self {
            delimiter: b',',
            date_format: "%Y-%m-%d".to_string(),
            has_header: true,
            reverse: false,
            num_rows: None,
        }
    }
}

/// Parallel columns of an OHLCV price history, oldest row first.
#[derive(Debug, Clone, Default)]
pub struct OhlcvSeries {
    pub dates: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl OhlcvSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// A two-column (date, count) series, e.g. subscriber or post counts.
#[derive(Debug, Clone, Default)]
pub struct CountSeries {
    pub dates: Vec<NaiveDate>,
    pub counts: Vec<u64>,
}

impl CountSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Counts as floats, for correlation against price series.
    pub fn counts_f64(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }
}

fn parse_date(raw: &str, format: &str) -> Result<NaiveDate, DatasetError> {
    // Some coinmarketcap exports write 'v' where the date separator belongs
    let normalized = raw.replace('v', "/");
    NaiveDate::parse_from_str(&normalized, format)
        .map_err(|_| DatasetError::DateParse(raw.to_string()))
}

fn read_rows(path: &Path, options: &ReadOptions) -> Result<Vec<csv::StringRecord>, DatasetError> {
    if !path.is_file() {
        return Err(DatasetError::NotFound(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .flexible(true)
        .from_path(path)?;

    let mut rows = reader.records().collect::<Result<Vec<_>, _>>()?;

    if options.reverse {
        rows.reverse();
    }

    if let Some(limit) = options.num_rows {
        if rows.len() > limit {
            rows.drain(..rows.len() - limit);
        }
    }

    Ok(rows)
}

fn field<'a>(record: &'a csv::StringRecord, index: usize) -> Result<&'a str, DatasetError> {
    record.get(index).ok_or_else(|| {
        DatasetError::MalformedRecord(format!("missing column {}: {:?}", index, record))
    })
}

/// Read an OHLCV export into parallel columns, oldest row first.
pub fn read_ohlcv_file(
    path: &Path,
    columns: &OhlcvColumns,
    options: &ReadOptions,
) -> Result<OhlcvSeries, DatasetError> {
    let rows = read_rows(path, options)?;
    let mut series = OhlcvSeries::default();

    for record in &rows {
        series.dates.push(parse_date(field(record, columns.date)?, &options.date_format)?);
        series.open.push(field(record, columns.open)?.parse()?);
        series.high.push(field(record, columns.high)?.parse()?);
        series.low.push(field(record, columns.low)?.parse()?);
        series.close.push(field(record, columns.close)?.parse()?);
        series.volume.push(field(record, columns.volume)?.parse()?);
    }

    Ok(series)
}

/// Read a two-column (date, count) file.
pub fn read_count_file(path: &Path, options: &ReadOptions) -> Result<CountSeries, DatasetError> {
    let rows = read_rows(path, options)?;
    let mut series = CountSeries::default();

    for record in &rows {
        series.dates.push(parse_date(field(record, 0)?, &options.date_format)?);
        series.counts.push(field(record, 1)?.trim().parse()?);
    }

    Ok(series)
}
