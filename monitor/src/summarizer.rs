//! Aggregates consecutive records into one summary per logical interval.

use std::collections::HashMap;

use crate::error::MonitorError;
use crate::reader::RecordSource;
use crate::types::{IntervalSummary, LogRecord};

/// Running totals for the interval being read.
struct Accumulator {
    start: i64,
    current: i64,
    byte_sum: u128,
    count: u64,
    hits: HashMap<String, u64>,
    top_section: String,
    top_hits: u64,
}

impl Accumulator {
    fn start(record: &LogRecord) -> Self {
        let mut acc = Self {
            start: record.timestamp,
            current: record.timestamp,
            byte_sum: 0,
            count: 0,
            hits: HashMap::new(),
            top_section: String::new(),
            top_hits: 0,
        };
        acc.add(record);
        acc
    }

    fn add(&mut self, record: &LogRecord) {
        self.current = record.timestamp;
        self.byte_sum += u128::from(record.byte_count);
        self.count += 1;

        let hits = self.hits.entry(record.section().to_string()).or_insert(0);
        *hits += 1;
        // on a tie the section that reached the count first stays on top
        if *hits > self.top_hits {
            self.top_hits = *hits;
            self.top_section = record.section().to_string();
        }
    }

    fn elapsed(&self) -> f64 {
        (self.current - self.start) as f64
    }

    fn finish(self) -> IntervalSummary {
        IntervalSummary {
            end_timestamp: self.current,
            average_bytes: self.byte_sum as f64 / self.count as f64,
            top_section: self.top_section,
            record_count: self.count,
        }
    }
}

/// Reads records until `interval_secs` of log time has elapsed since the first one.
///
/// The record that reaches the interval boundary is part of the summary.
/// Returns `Ok(None)` when the stream ends before the interval completes; the
/// records already read for that interval are dropped.
pub fn summarize<S: RecordSource + ?Sized>(
    source: &mut S,
    interval_secs: f64,
) -> Result<Option<IntervalSummary>, MonitorError> {
    let Some(first) = source.next_record()? else {
        return Ok(None);
    };
    let mut acc = Accumulator::start(&first);

    while acc.elapsed() < interval_secs {
        let Some(record) = source.next_record()? else {
            tracing::debug!(
                dropped = acc.count,
                "log ended inside an interval, dropping partial summary"
            );
            return Ok(None);
        };
        acc.add(&record);
    }

    Ok(Some(acc.finish()))
}
