//! Event sinks: where summaries and alerts end up.

use std::io::{self, Write};

use crossterm::style::{StyledContent, Stylize};

use crate::types::{IntervalSummary, MonitorEvent};

/// Receives the monitor's events in order.
pub trait EventSink {
    fn on_summary(&mut self, summary: &IntervalSummary) -> io::Result<()>;
    fn on_alert(&mut self, rate: f64, timestamp: i64) -> io::Result<()>;
    fn on_recovery(&mut self, rate: f64, timestamp: i64) -> io::Result<()>;
    fn on_end_of_stream(&mut self) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Info,
    Error,
    Success,
    Warning,
}

impl Label {
    fn text(self) -> &'static str {
        match self {
            Label::Info => "INFO",
            Label::Error => "ERROR",
            Label::Success => "SUCCESS",
            Label::Warning => "WARNING",
        }
    }

    fn styled(self) -> StyledContent<&'static str> {
        let text = self.text();
        match self {
            Label::Info => text.on_blue(),
            Label::Error => text.on_red(),
            Label::Success => text.on_green(),
            Label::Warning => text.on_yellow(),
        }
    }
}

/// Human-readable lines with a colored level label, one per event.
pub struct ConsoleSink<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, label: Label, text: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.out, "{} {text}", label.styled())?;
        } else {
            writeln!(self.out, "{} {text}", label.text())?;
        }
        self.out.flush()
    }
}

impl<W: Write> EventSink for ConsoleSink<W> {
    fn on_summary(&mut self, summary: &IntervalSummary) -> io::Result<()> {
        let text = format!(
            "{}\t{:.2}\t{}",
            summary.end_timestamp, summary.average_bytes, summary.top_section
        );
        self.line(Label::Info, &text)
    }

    fn on_alert(&mut self, rate: f64, timestamp: i64) -> io::Result<()> {
        let text = format!(
            "High traffic generated an alert - hits = {rate:.2}/s, triggered at {timestamp}"
        );
        self.line(Label::Error, &text)
    }

    fn on_recovery(&mut self, rate: f64, timestamp: i64) -> io::Result<()> {
        let text = format!("Traffic has stabilized - hits = {rate:.2}/s, recovered at {timestamp}");
        self.line(Label::Success, &text)
    }

    fn on_end_of_stream(&mut self) -> io::Result<()> {
        self.line(Label::Warning, "End of file has been reached.")
    }
}

/// One JSON object per line, for piping into other tools.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, event: &MonitorEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn on_summary(&mut self, summary: &IntervalSummary) -> io::Result<()> {
        self.write(&MonitorEvent::summary(summary))
    }

    fn on_alert(&mut self, rate: f64, timestamp: i64) -> io::Result<()> {
        self.write(&MonitorEvent::Alert { rate, timestamp })
    }

    fn on_recovery(&mut self, rate: f64, timestamp: i64) -> io::Result<()> {
        self.write(&MonitorEvent::Recovery { rate, timestamp })
    }

    fn on_end_of_stream(&mut self) -> io::Result<()> {
        self.write(&MonitorEvent::EndOfStream)
    }
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    pub events: Vec<MonitorEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, MonitorEvent::Alert { .. }))
            .count()
    }

    pub fn recoveries(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, MonitorEvent::Recovery { .. }))
            .count()
    }
}

impl EventSink for EventLog {
    fn on_summary(&mut self, summary: &IntervalSummary) -> io::Result<()> {
        self.events.push(MonitorEvent::summary(summary));
        Ok(())
    }

    fn on_alert(&mut self, rate: f64, timestamp: i64) -> io::Result<()> {
        self.events.push(MonitorEvent::Alert { rate, timestamp });
        Ok(())
    }

    fn on_recovery(&mut self, rate: f64, timestamp: i64) -> io::Result<()> {
        self.events.push(MonitorEvent::Recovery { rate, timestamp });
        Ok(())
    }

    fn on_end_of_stream(&mut self) -> io::Result<()> {
        self.events.push(MonitorEvent::EndOfStream);
        Ok(())
    }
}
