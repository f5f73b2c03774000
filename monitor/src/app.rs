use std::future::Future;
use std::time::Duration;

use tokio::time;

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::output::EventSink;
use crate::reader::RecordSource;
use crate::state::{AlertState, RollingWindow};
use crate::summarizer::summarize;

/// Wait inserted between two summaries.
pub trait Pacer {
    fn pause(&mut self, interval: Duration) -> impl Future<Output = ()> + Send;
}

/// Replays a finished log as fast as it can be read.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    async fn pause(&mut self, _interval: Duration) {}
}

/// Sleeps for the interval length, as if the log were being written live.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimePacing;

impl Pacer for RealTimePacing {
    async fn pause(&mut self, interval: Duration) {
        time::sleep(interval).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Outcome of a run that reached the end of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub intervals: u64,
    pub alerts: u64,
    pub recoveries: u64,
    pub final_state: AlertState,
}

/// Drives summarizing, rate tracking and alerting, one interval per iteration.
pub struct Monitor<S, P = NoPacing> {
    config: MonitorConfig,
    window: RollingWindow,
    alert: AlertState,
    loop_state: LoopState,
    sink: S,
    pacer: P,
}

impl<S: EventSink> Monitor<S, NoPacing> {
    pub fn new(config: MonitorConfig, sink: S) -> Self {
        Self::with_pacer(config, sink, NoPacing)
    }
}

impl<S: EventSink, P: Pacer> Monitor<S, P> {
    pub fn with_pacer(config: MonitorConfig, sink: S, pacer: P) -> Self {
        Self {
            window: RollingWindow::new(&config),
            config,
            alert: AlertState::Normal,
            loop_state: LoopState::Running,
            sink,
            pacer,
        }
    }

    /// Starts from an alert state other than `Normal`.
    pub fn with_alert_state(mut self, state: AlertState) -> Self {
        self.alert = state;
        self
    }

    pub fn alert_state(&self) -> AlertState {
        self.alert
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Consumes `source` until it is exhausted.
    ///
    /// A parse or I/O failure aborts the run; reaching the end of the log does not.
    pub async fn run<R: RecordSource + ?Sized>(
        &mut self,
        source: &mut R,
    ) -> Result<RunReport, MonitorError> {
        let mut report = RunReport {
            intervals: 0,
            alerts: 0,
            recoveries: 0,
            final_state: self.alert,
        };
        let pause = self.config.pause();
        self.loop_state = LoopState::Running;
        tracing::info!(
            threshold = self.config.threshold(),
            interval_secs = self.config.interval_secs(),
            window_secs = self.config.window_secs(),
            "monitor started"
        );

        while self.loop_state == LoopState::Running {
            let Some(summary) = summarize(source, self.config.interval_secs())? else {
                self.loop_state = LoopState::Stopped;
                self.sink.on_end_of_stream().map_err(MonitorError::Emit)?;
                break;
            };
            report.intervals += 1;
            tracing::debug!(
                end = summary.end_timestamp,
                records = summary.record_count,
                top_section = %summary.top_section,
                "interval summarized"
            );
            self.sink.on_summary(&summary).map_err(MonitorError::Emit)?;

            self.window.push(summary.record_count);
            let rate = self.window.rate();

            if let Some(next) = self.alert.transition(rate, self.config.threshold()) {
                self.alert = next;
                match next {
                    AlertState::HighTraffic => {
                        report.alerts += 1;
                        tracing::info!(rate, timestamp = summary.end_timestamp, "high traffic");
                        self.sink
                            .on_alert(rate, summary.end_timestamp)
                            .map_err(MonitorError::Emit)?;
                    }
                    AlertState::Normal => {
                        report.recoveries += 1;
                        tracing::info!(rate, timestamp = summary.end_timestamp, "traffic recovered");
                        self.sink
                            .on_recovery(rate, summary.end_timestamp)
                            .map_err(MonitorError::Emit)?;
                    }
                }
            }

            self.pacer.pause(pause).await;
        }

        report.final_state = self.alert;
        tracing::info!(
            intervals = report.intervals,
            alerts = report.alerts,
            recoveries = report.recoveries,
            "monitor stopped at end of log"
        );
        Ok(report)
    }
}
