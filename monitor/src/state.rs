use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::MonitorConfig;

/// Request counts of the most recent intervals, oldest first.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    counts: VecDeque<u64>,
    capacity: usize,
    window_secs: f64,
}

impl RollingWindow {
    pub fn new(config: &MonitorConfig) -> Self {
        let capacity = config.window_capacity();
        Self {
            counts: VecDeque::with_capacity(capacity + 1),
            capacity,
            window_secs: config.window_secs(),
        }
    }

    pub fn push(&mut self, count: u64) {
        self.counts.push_back(count);

        // drop the oldest intervals
        while self.counts.len() > self.capacity {
            self.counts.pop_front();
        }
    }

    /// Requests per second over the whole window span.
    pub fn rate(&self) -> f64 {
        self.total() as f64 / self.window_secs
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Traffic alert state of the monitored log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    #[default]
    Normal,
    HighTraffic,
}

impl AlertState {
    /// Next state for the given rate, or `None` if the threshold was not crossed.
    ///
    /// Entering high traffic needs `rate >= threshold`; leaving it needs
    /// `rate < threshold`.
    pub fn transition(self, rate: f64, threshold: f64) -> Option<AlertState> {
        match self {
            AlertState::Normal if rate >= threshold => Some(AlertState::HighTraffic),
            AlertState::HighTraffic if rate < threshold => Some(AlertState::Normal),
            _ => None,
        }
    }
}
