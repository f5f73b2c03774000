//! Sequential access to access-log records.
//!
//! The log is a CSV stream whose header names the columns. Only `date`,
//! `bytes` and `request` are read; any other column is ignored.

use std::collections::VecDeque;
use std::io::Read;

use serde::Deserialize;

use crate::error::MonitorError;
use crate::types::LogRecord;

/// Pull interface over log records. `Ok(None)` marks the end of the stream.
pub trait RecordSource {
    fn next_record(&mut self) -> Result<Option<LogRecord>, MonitorError>;
}

impl RecordSource for VecDeque<LogRecord> {
    fn next_record(&mut self) -> Result<Option<LogRecord>, MonitorError> {
        Ok(self.pop_front())
    }
}

#[derive(Deserialize)]
struct CsvRow {
    date: i64,
    bytes: u64,
    request: String,
}

pub struct CsvRecordReader<R> {
    inner: csv::Reader<R>,
    headers: csv::StringRecord,
    row: csv::StringRecord,
}

impl<R: Read> CsvRecordReader<R> {
    /// Reads the header line up front so a broken header fails before any record.
    pub fn new(source: R) -> Result<Self, MonitorError> {
        let mut inner = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);
        let headers = inner.headers()?.clone();

        Ok(Self {
            inner,
            headers,
            row: csv::StringRecord::new(),
        })
    }
}

impl<R: Read> RecordSource for CsvRecordReader<R> {
    fn next_record(&mut self) -> Result<Option<LogRecord>, MonitorError> {
        if !self.inner.read_record(&mut self.row)? {
            return Ok(None);
        }
        let line = self.row.position().map_or(0, |pos| pos.line());

        let row: CsvRow = self
            .row
            .deserialize(Some(&self.headers))
            .map_err(|err| MonitorError::parse(line, err))?;
        let record = LogRecord::new(row.date, row.bytes, row.request)
            .map_err(|err| MonitorError::parse(line, err))?;
        Ok(Some(record))
    }
}
