//! CSV table adapter.
//!
//! Layout: one timestamp column (default `date`) followed by numeric columns.
//! Empty cells read as NaN and NaN is written as an empty cell.

use crate::domain::error::TaframeError;
use crate::domain::indicator::IndicatorOutput;
use crate::domain::table::Table;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const DEFAULT_INDEX_COLUMN: &str = "date";

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvAdapter {
    index_column: String,
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_COLUMN)
    }
}

impl CsvAdapter {
    pub fn new(index_column: impl Into<String>) -> Self {
        Self {
            index_column: index_column.into(),
        }
    }

    pub fn index_column(&self) -> &str {
        &self.index_column
    }

    pub fn read_table<R: Read>(&self, reader: R) -> Result<Table, TaframeError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers().map_err(csv_error)?.clone();

        let index_pos = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(&self.index_column))
            .ok_or_else(|| TaframeError::Data {
                reason: format!("index column '{}' not found in header", self.index_column),
            })?;
        let names: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index_pos)
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        let mut index = Vec::new();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(csv_error)?;
            let line = row + 2;

            let stamp = record.get(index_pos).unwrap_or_default();
            index.push(parse_timestamp(stamp).ok_or_else(|| TaframeError::Data {
                reason: format!("line {line}: invalid timestamp '{stamp}'"),
            })?);

            for ((pos, name), values) in names.iter().zip(columns.iter_mut()) {
                let cell = record.get(*pos).unwrap_or_default();
                values.push(parse_cell(cell).ok_or_else(|| TaframeError::Data {
                    reason: format!("line {line}: invalid {name} value '{cell}'"),
                })?);
            }
        }

        let mut table = Table::new(index);
        for ((_, name), values) in names.into_iter().zip(columns) {
            table.insert_column(name, values)?;
        }
        Ok(table)
    }

    pub fn write_table<W: Write>(&self, table: &Table, writer: W) -> Result<(), TaframeError> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = vec![self.index_column.clone()];
        header.extend(table.column_names());
        wtr.write_record(&header).map_err(csv_error)?;

        let date_only = table.index().iter().all(|ts| ts.time() == NaiveTime::MIN);
        for (row, ts) in table.index().iter().enumerate() {
            let mut record = vec![format_timestamp(ts, date_only)];
            record.extend(table.columns().iter().map(|c| format_cell(c.values[row])));
            wtr.write_record(&record).map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// A series is written against its index; a frame against its row number.
    pub fn write_output<W: Write>(
        &self,
        output: &IndicatorOutput,
        writer: W,
    ) -> Result<(), TaframeError> {
        match output {
            IndicatorOutput::Series(series) => {
                let table = Table::new(series.index.clone())
                    .with_column(series.name.clone(), series.values.clone())?;
                self.write_table(&table, writer)
            }
            IndicatorOutput::Frame(frame) => {
                let mut wtr = csv::Writer::from_writer(writer);
                let mut header = vec!["bin".to_string()];
                header.extend(frame.columns.iter().map(|c| c.name.clone()));
                wtr.write_record(&header).map_err(csv_error)?;
                for row in 0..frame.rows() {
                    let mut record = vec![row.to_string()];
                    record.extend(frame.columns.iter().map(|c| format_cell(c.values[row])));
                    wtr.write_record(&record).map_err(csv_error)?;
                }
                wtr.flush()?;
                Ok(())
            }
        }
    }
}

impl DataPort for CsvAdapter {
    fn load_table(&self, path: &Path) -> Result<Table, TaframeError> {
        let file = File::open(path).map_err(|e| TaframeError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        self.read_table(file)
    }

    fn store_table(&self, table: &Table, path: &Path) -> Result<(), TaframeError> {
        let file = File::create(path).map_err(|e| TaframeError::Data {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;
        self.write_table(table, file)
    }
}

fn csv_error(e: csv::Error) -> TaframeError {
    TaframeError::Data {
        reason: format!("CSV error: {e}"),
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn format_timestamp(ts: &NaiveDateTime, date_only: bool) -> String {
    if date_only {
        ts.format(DATE_FORMAT).to_string()
    } else {
        ts.format(DATETIME_FORMATS[0]).to_string()
    }
}

fn parse_cell(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        Some(f64::NAN)
    } else {
        raw.parse().ok()
    }
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}
