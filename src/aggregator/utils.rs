use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::errors::AggregatorError;
use super::structs::{AggregatedPoint, Interval, Tick};

use crate::common::constants::{TICK_TIME_FORMAT, TICK_TIME_FORMAT_FRACTIONAL};

/// Parse a tick timestamp. The source files mix two formats (with and
/// without fractional seconds), so both are accepted; anything else aborts
/// the run.
pub fn parse_tick_time(value: &str) -> Result<NaiveDateTime, AggregatorError> {
    NaiveDateTime::parse_from_str(value, TICK_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, TICK_TIME_FORMAT_FRACTIONAL))
        .map_err(|_| AggregatorError::TimestampParse(value.to_string()))
}

/// Parse one (timestamp, identifier, price) record into a tick. The middle
/// column is carried by the source files but never used.
fn parse_tick_record(record: &csv::StringRecord) -> Result<Tick, AggregatorError> {
    if record.len() < 3 {
        return Err(AggregatorError::MalformedRecord(format!(
            "expected 3 columns, got {}: {:?}",
            record.len(),
            record
        )));
    }

    let time = parse_tick_time(&record[0])?;
    let price: f64 = record[2].parse()?;

    Ok(Tick { time, price })
}

/// Aggregate a single tick file into per-bucket mean prices.
///
/// `carry` is the timestamp of the last tick seen in the previous file (if
/// any); it seeds the running bucket so gaps spanning a file boundary are
/// zero-filled. Returns the aggregated points plus the carry for the next
/// file.
pub fn aggregate_file(
    path: &Path,
    carry: Option<NaiveDateTime>,
    interval: Interval,
) -> Result<(Vec<AggregatedPoint>, Option<NaiveDateTime>), AggregatorError> {
    if !path.is_file() {
        return Err(AggregatorError::NotFound(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut points = Vec::new();
    let mut prev: Option<NaiveDateTime> = carry;
    let mut count: u64 = 0;
    let mut sum: f64 = 0.0;

    for record in reader.records() {
        let record = record?;
        let tick = parse_tick_record(&record)?;

        match prev {
            Some(p) if interval.truncate(p) == interval.truncate(tick.time) => {
                count += 1;
                sum += tick.price;
            }
            Some(p) => {
                let prev_bucket = interval.truncate(p);
                let new_bucket = interval.truncate(tick.time);

                // Close the running bucket. A carried-over bucket with no
                // ticks in this file was already emitted by the previous
                // file's final flush.
                if count > 0 {
                    points.push(AggregatedPoint {
                        bucket: prev_bucket,
                        value: sum / count as f64,
                    });
                }

                // Zero-valued synthetic points for every bucket strictly
                // between the closed bucket and the new one.
                let mut cursor = interval.increment(prev_bucket);
                while cursor < new_bucket {
                    points.push(AggregatedPoint { bucket: cursor, value: 0.0 });
                    cursor = interval.increment(cursor);
                }

                count = 1;
                sum = tick.price;
            }
            None => {
                count = 1;
                sum = tick.price;
            }
        }

        prev = Some(tick.time);
    }

    // Final open bucket
    if count > 0 {
        if let Some(p) = prev {
            points.push(AggregatedPoint {
                bucket: interval.truncate(p),
                value: sum / count as f64,
            });
        }
    }

    debug!("Aggregated {} points from {}", points.len(), path.display());

    Ok((points, prev))
}

/// Aggregate every tick file in a directory into one merged, gap-free
/// series.
///
/// Files are processed in lexical filename order, carrying the last-seen
/// timestamp across file boundaries. Source files are assumed
/// non-overlapping in time; buckets that do straddle a file boundary are
/// reconciled by [`merge_duplicate_buckets`] afterwards.
pub fn aggregate_directory(
    dir: &Path,
    interval: Interval,
) -> Result<Vec<AggregatedPoint>, AggregatorError> {
    if !dir.is_dir() {
        return Err(AggregatorError::NotFound(dir.display().to_string()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut data = Vec::new();
    let mut carry: Option<NaiveDateTime> = None;

    for file in &files {
        info!("📄 Parsing tick file: {}", file.display());
        let (points, next_carry) = aggregate_file(file, carry, interval)?;
        data.extend(points);
        carry = next_carry;
    }

    info!("🔗 Merging duplicate buckets across {} files", files.len());
    merge_duplicate_buckets(&mut data);

    Ok(data)
}

/// Collapse adjacent points that share a bucket key into a single point.
///
/// Runs of any length are folded left-to-right with pairwise averages, so a
/// bucket split across several files ends up as exactly one output row.
pub fn merge_duplicate_buckets(points: &mut Vec<AggregatedPoint>) {
    let mut merged: Vec<AggregatedPoint> = Vec::with_capacity(points.len());

    for point in points.drain(..) {
        match merged.last_mut() {
            Some(last) if last.bucket == point.bucket => {
                last.value = (last.value + point.value) / 2.0;
            }
            _ => merged.push(point),
        }
    }

    *points = merged;
}

/// Write the aggregated series as two comma-separated columns with no
/// header: bucket timestamp and value, one row per bucket.
pub fn write_series(
    path: &Path,
    points: &[AggregatedPoint],
    interval: Interval,
    human_readable: bool,
) -> Result<(), AggregatorError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for point in points {
        writeln!(
            writer,
            "{},{}",
            point.render_time(interval, human_readable),
            point.value
        )?;
    }

    writer.flush()?;
    Ok(())
}
