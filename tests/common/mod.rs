#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::io::Write;
use taframe::domain::series::Series;
use taframe::domain::table::Table;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `count` one-minute bars starting at 09:30 on `day`.
pub fn session(day: NaiveDate, count: usize) -> Vec<NaiveDateTime> {
    let open = day.and_hms_opt(9, 30, 0).unwrap();
    (0..count)
        .map(|i| open + chrono::Duration::minutes(i as i64))
        .collect()
}

pub fn daily_index(start: NaiveDate, count: usize) -> Vec<NaiveDateTime> {
    (0..count)
        .map(|i| (start + chrono::Duration::days(i as i64)).and_hms_opt(0, 0, 0).unwrap())
        .collect()
}

/// OHLCV table with lowercase columns derived from `close`:
/// open = close, high = close + 1, low = close - 1, volume = 1000 + 10·i.
pub fn ohlcv_table(index: Vec<NaiveDateTime>, close: &[f64]) -> Table {
    assert_eq!(index.len(), close.len());
    Table::new(index)
        .with_column("open", close.to_vec())
        .unwrap()
        .with_column("high", close.iter().map(|c| c + 1.0).collect())
        .unwrap()
        .with_column("low", close.iter().map(|c| c - 1.0).collect())
        .unwrap()
        .with_column("close", close.to_vec())
        .unwrap()
        .with_column(
            "volume",
            (0..close.len()).map(|i| 1000.0 + 10.0 * i as f64).collect(),
        )
        .unwrap()
}

/// Same data as [`ohlcv_table`] under capitalized column names.
pub fn capitalized_table(index: Vec<NaiveDateTime>, close: &[f64]) -> Table {
    let lower = ohlcv_table(index.clone(), close);
    let mut table = Table::new(index);
    for column in lower.columns() {
        let mut name = column.name.clone();
        name[..1].make_ascii_uppercase();
        table.insert_column(name, column.values.clone()).unwrap();
    }
    table
}

pub fn series(name: &str, index: &[NaiveDateTime], values: &[f64]) -> Series {
    Series::new(name, index.to_vec(), values.to_vec())
}

/// Sine-wave closes around 100.
pub fn wave(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 100.0 + 5.0 * (i as f64 * 0.3).sin() + 0.1 * i as f64)
        .collect()
}

pub fn write_temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
