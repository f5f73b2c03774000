//! Replays an HTTP access log, summarizes traffic per logical interval and
//! raises an alert while the request rate over a rolling window stays at or
//! above a threshold.
//!
//! ```no_run
//! use std::fs::File;
//! use http_log_monitor::{ConsoleSink, CsvRecordReader, Monitor, MonitorConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitorConfig::new(10.0, 10.0, 120.0)?;
//! let mut reader = CsvRecordReader::new(File::open("access.csv")?)?;
//! let mut monitor = Monitor::new(config, ConsoleSink::new(std::io::stdout(), true));
//! let report = monitor.run(&mut reader).await?;
//! println!("{} intervals", report.intervals);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod reader;
pub mod state;
pub mod summarizer;
pub mod types;

pub use app::{LoopState, Monitor, NoPacing, Pacer, RealTimePacing, RunReport};
pub use config::{ConfigError, MonitorConfig};
pub use error::MonitorError;
pub use output::{ConsoleSink, EventLog, EventSink, JsonLinesSink};
pub use reader::{CsvRecordReader, RecordSource};
pub use state::{AlertState, RollingWindow};
pub use summarizer::summarize;
pub use types::{IntervalSummary, LogRecord, MonitorEvent};
