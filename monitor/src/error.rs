use std::io;

use thiserror::Error;

/// Fatal failures of a monitoring run. End of the log is not one of them.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("malformed log record at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error("failed to read log: {0}")]
    Io(#[from] io::Error),

    #[error("failed to emit event: {0}")]
    Emit(#[source] io::Error),
}

impl MonitorError {
    pub fn parse(line: u64, reason: impl ToString) -> Self {
        Self::Parse {
            line,
            reason: reason.to_string(),
        }
    }
}

impl From<csv::Error> for MonitorError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |pos| pos.line());
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            csv::ErrorKind::Utf8 { err, .. } => Self::parse(line, err),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => Self::parse(
                line,
                format!("expected {expected_len} fields, found {len}"),
            ),
            csv::ErrorKind::Deserialize { err, .. } => Self::parse(line, err),
            other => Self::parse(line, format!("{other:?}")),
        }
    }
}
