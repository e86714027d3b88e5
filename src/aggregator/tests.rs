use chrono::NaiveDateTime;
use tempfile::tempdir;

use super::errors::AggregatorError;
use super::structs::{AggregatedPoint, Interval};
use super::utils::{
    aggregate_directory, aggregate_file, merge_duplicate_buckets, parse_tick_time, write_series,
};

fn dt(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}

#[test]
fn test_interval_parse() {
    assert_eq!(Interval::parse("day").unwrap(), Interval::Day);
    assert_eq!(Interval::parse("Hour").unwrap(), Interval::Hour);
    assert_eq!(Interval::parse("MINUTE").unwrap(), Interval::Minute);
    assert!(matches!(
        Interval::parse("fortnight"),
        Err(AggregatorError::InvalidInterval(_))
    ));
}

#[test]
fn test_tick_time_accepts_both_formats() {
    assert_eq!(
        parse_tick_time("2018-03-01 12:30:45").unwrap(),
        dt("2018-03-01 12:30:45")
    );

    let fractional = parse_tick_time("2018-03-01 12:30:45.750").unwrap();
    assert_eq!(Interval::Minute.truncate(fractional), dt("2018-03-01 12:30:00"));

    assert!(matches!(
        parse_tick_time("01/03/2018 12:30"),
        Err(AggregatorError::TimestampParse(_))
    ));
}

#[test]
fn test_truncate_drops_subfield_components() {
    let t = parse_tick_time("2018-03-05 17:42:13.123").unwrap();
    assert_eq!(Interval::Day.truncate(t), dt("2018-03-05 00:00:00"));
    assert_eq!(Interval::Hour.truncate(t), dt("2018-03-05 17:00:00"));
    assert_eq!(Interval::Minute.truncate(t), dt("2018-03-05 17:42:00"));
}

#[test]
fn test_truncate_distinguishes_same_day_of_month() {
    // Same day-of-month in different months must be different buckets
    let january = dt("2018-01-05 10:00:00");
    let february = dt("2018-02-05 10:00:00");
    assert_ne!(Interval::Day.truncate(january), Interval::Day.truncate(february));
}

#[test]
fn test_increment() {
    assert_eq!(
        Interval::Day.increment(dt("2018-01-31 00:00:00")),
        dt("2018-02-01 00:00:00")
    );
    assert_eq!(
        Interval::Hour.increment(dt("2018-01-01 23:00:00")),
        dt("2018-01-02 00:00:00")
    );
    assert_eq!(
        Interval::Minute.increment(dt("2018-01-01 10:59:00")),
        dt("2018-01-01 11:00:00")
    );
}

#[test]
fn test_single_file_means_per_bucket() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ticks.csv");
    std::fs::write(
        &path,
        "time,id,price\n\
         2018-01-01 10:00:05,a,10.0\n\
         2018-01-01 10:30:00,b,20.0\n\
         2018-01-01 11:15:00.250,c,30.0\n",
    )
    .unwrap();

    let (points, carry) = aggregate_file(&path, None, Interval::Hour).unwrap();

    assert_eq!(
        points,
        vec![
            AggregatedPoint { bucket: dt("2018-01-01 10:00:00"), value: 15.0 },
            AggregatedPoint { bucket: dt("2018-01-01 11:00:00"), value: 30.0 },
        ]
    );
    // Carry is the last tick time, fractional part included
    assert_eq!(Interval::Hour.truncate(carry.unwrap()), dt("2018-01-01 11:00:00"));
}

#[test]
fn test_gap_fill_within_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ticks.csv");
    std::fs::write(
        &path,
        "time,id,price\n\
         2018-01-01 10:10:00,a,10.0\n\
         2018-01-01 13:20:00,b,40.0\n",
    )
    .unwrap();

    let (points, _) = aggregate_file(&path, None, Interval::Hour).unwrap();

    assert_eq!(
        points,
        vec![
            AggregatedPoint { bucket: dt("2018-01-01 10:00:00"), value: 10.0 },
            AggregatedPoint { bucket: dt("2018-01-01 11:00:00"), value: 0.0 },
            AggregatedPoint { bucket: dt("2018-01-01 12:00:00"), value: 0.0 },
            AggregatedPoint { bucket: dt("2018-01-01 13:00:00"), value: 40.0 },
        ]
    );
}

#[test]
fn test_gap_fill_across_files() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("01.csv"),
        "time,id,price\n\
         2018-01-01 09:00:00,a,10.0\n\
         2018-01-01 21:00:00,b,20.0\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("02.csv"),
        "time,id,price\n\
         2018-01-04 12:00:00,c,40.0\n",
    )
    .unwrap();

    let points = aggregate_directory(dir.path(), Interval::Day).unwrap();

    assert_eq!(
        points,
        vec![
            AggregatedPoint { bucket: dt("2018-01-01 00:00:00"), value: 15.0 },
            AggregatedPoint { bucket: dt("2018-01-02 00:00:00"), value: 0.0 },
            AggregatedPoint { bucket: dt("2018-01-03 00:00:00"), value: 0.0 },
            AggregatedPoint { bucket: dt("2018-01-04 00:00:00"), value: 40.0 },
        ]
    );
}

#[test]
fn test_bucket_straddling_file_boundary_is_merged() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("01.csv"),
        "time,id,price\n2018-01-01 08:00:00,a,10.0\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("02.csv"),
        "time,id,price\n2018-01-01 16:00:00,b,30.0\n",
    )
    .unwrap();

    let points = aggregate_directory(dir.path(), Interval::Day).unwrap();

    assert_eq!(
        points,
        vec![AggregatedPoint { bucket: dt("2018-01-01 00:00:00"), value: 20.0 }]
    );
}

#[test]
fn test_merge_collapses_runs_completely() {
    let bucket = dt("2018-01-01 00:00:00");
    let mut points = vec![
        AggregatedPoint { bucket, value: 1.0 },
        AggregatedPoint { bucket, value: 2.0 },
        AggregatedPoint { bucket, value: 3.0 },
        AggregatedPoint { bucket: dt("2018-01-02 00:00:00"), value: 5.0 },
    ];

    merge_duplicate_buckets(&mut points);

    // ((1 + 2) / 2 + 3) / 2 = 2.25
    assert_eq!(
        points,
        vec![
            AggregatedPoint { bucket, value: 2.25 },
            AggregatedPoint { bucket: dt("2018-01-02 00:00:00"), value: 5.0 },
        ]
    );
}

#[test]
fn test_missing_directory_is_not_found() {
    let result = aggregate_directory(std::path::Path::new("/no/such/dir"), Interval::Day);
    assert!(matches!(result, Err(AggregatorError::NotFound(_))));
}

#[test]
fn test_missing_file_is_not_found() {
    let result = aggregate_file(std::path::Path::new("/no/such/file.csv"), None, Interval::Day);
    assert!(matches!(result, Err(AggregatorError::NotFound(_))));
}

#[test]
fn test_bad_timestamp_aborts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ticks.csv");
    std::fs::write(&path, "time,id,price\nnot-a-time,a,10.0\n").unwrap();

    let result = aggregate_file(&path, None, Interval::Hour);
    assert!(matches!(result, Err(AggregatorError::TimestampParse(_))));
}

#[test]
fn test_bad_price_aborts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ticks.csv");
    std::fs::write(&path, "time,id,price\n2018-01-01 10:00:00,a,cheap\n").unwrap();

    let result = aggregate_file(&path, None, Interval::Hour);
    assert!(matches!(result, Err(AggregatorError::PriceParse(_))));
}

#[test]
fn test_short_record_aborts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ticks.csv");
    std::fs::write(&path, "time,id,price\n2018-01-01 10:00:00,a\n").unwrap();

    let result = aggregate_file(&path, None, Interval::Hour);
    assert!(matches!(result, Err(AggregatorError::MalformedRecord(_))));
}

#[test]
fn test_write_series_epoch_and_human() {
    let dir = tempdir().unwrap();
    let points = vec![
        AggregatedPoint { bucket: dt("2018-01-01 00:00:00"), value: 15.5 },
        AggregatedPoint { bucket: dt("2018-01-02 00:00:00"), value: 0.0 },
    ];

    let epoch_path = dir.path().join("epoch.csv");
    let human_path = dir.path().join("human.csv");
    write_series(&epoch_path, &points, Interval::Day, false).unwrap();
    write_series(&human_path, &points, Interval::Day, true).unwrap();

    let epoch = std::fs::read_to_string(&epoch_path).unwrap();
    let human = std::fs::read_to_string(&human_path).unwrap();

    assert_eq!(epoch, "1514764800,15.5\n1514851200,0\n");
    assert_eq!(human, "2018-01-01,15.5\n2018-01-02,0\n");

    // The value column is independent of the timestamp representation
    let values = |s: &str| {
        s.lines()
            .map(|l| l.split(',').nth(1).unwrap().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(values(&epoch), values(&human));
}
