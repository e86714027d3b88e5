use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime};

use super::errors::AggregatorError;

use crate::common::constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

/// Bucket granularity for the merged output series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Day,
    Hour,
    Minute,
}

impl Interval {
    /// Parse a granularity string from configuration ("day", "hour", "minute").
    pub fn parse(value: &str) -> Result<Self, AggregatorError> {
        match value.to_lowercase().as_str() {
            "day" => Ok(Interval::Day),
            "hour" => Ok(Interval::Hour),
            "minute" => Ok(Interval::Minute),
            other => Err(AggregatorError::InvalidInterval(other.to_string())),
        }
    }

    /// Display format for bucket timestamps in human-readable output.
    pub fn format_str(&self) -> &'static str {
        match self {
            Interval::Day => "%Y-%m-%d",
            Interval::Hour => "%Y-%m-%d %H:00:00",
            Interval::Minute => "%Y-%m-%d %H:%M:00",
        }
    }

    fn bucket_seconds(&self) -> i64 {
        match self {
            Interval::Day => SECONDS_PER_DAY,
            Interval::Hour => SECONDS_PER_HOUR,
            Interval::Minute => SECONDS_PER_MINUTE,
        }
    }

    /// Truncate a timestamp to the start of its bucket.
    ///
    /// Bucket identity is the full truncated timestamp, so ticks from
    /// different days/months/years never land in the same bucket.
    pub fn truncate(&self, time: NaiveDateTime) -> NaiveDateTime {
        let width = self.bucket_seconds();
        let secs = time.and_utc().timestamp();
        let bucket_secs = secs.div_euclid(width) * width;
        DateTime::from_timestamp(bucket_secs, 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or(time)
    }

    /// Start of the bucket immediately following `bucket`.
    pub fn increment(&self, bucket: NaiveDateTime) -> NaiveDateTime {
        bucket + chrono::Duration::seconds(self.bucket_seconds())
    }
}

/// A single raw (timestamp, price) observation from a source file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub time: NaiveDateTime,
    pub price: f64,
}

/// One row of the merged output series: a bucket start and either the mean
/// price of the ticks observed in that bucket or 0.0 for a synthetic fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedPoint {
    pub bucket: NaiveDateTime,
    pub value: f64,
}

impl AggregatedPoint {
    /// Render the bucket timestamp for output: human-readable per the
    /// interval's format, or Unix epoch seconds (UTC) otherwise.
    pub fn render_time(&self, interval: Interval, human_readable: bool) -> String {
        if human_readable {
            self.bucket.format(interval.format_str()).to_string()
        } else {
            self.bucket.and_utc().timestamp().to_string()
        }
    }
}

/// Runtime configuration for one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    pub interval: Interval,
    pub human_readable: bool,
}
