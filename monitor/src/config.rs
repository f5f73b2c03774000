//! Validated monitor configuration.
//!
//! All durations are logical seconds measured against the `date` column of
//! the log, never the wall clock.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_THRESHOLD: f64 = 10.0;
pub const DEFAULT_INTERVAL_SECS: f64 = 10.0;
pub const DEFAULT_WINDOW_SECS: f64 = 120.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("threshold must be >= 0 requests/s, got {0}")]
    NegativeThreshold(f64),

    #[error("log interval must be > 0 seconds, got {0}")]
    NonPositiveInterval(f64),

    #[error("log interval of {0} seconds is too long")]
    IntervalTooLong(f64),

    #[error("log window ({window}s) must be at least the log interval ({interval}s)")]
    WindowShorterThanInterval { window: f64, interval: f64 },
}

/// Threshold and timing knobs, fixed once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorConfig {
    threshold: f64,
    interval_secs: f64,
    window_secs: f64,
    pause: Duration,
}

impl MonitorConfig {
    pub fn new(threshold: f64, interval_secs: f64, window_secs: f64) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("threshold", threshold),
            ("log interval", interval_secs),
            ("log window", window_secs),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        if threshold < 0.0 {
            return Err(ConfigError::NegativeThreshold(threshold));
        }
        if interval_secs <= 0.0 {
            return Err(ConfigError::NonPositiveInterval(interval_secs));
        }
        let pause = Duration::try_from_secs_f64(interval_secs)
            .map_err(|_| ConfigError::IntervalTooLong(interval_secs))?;
        if window_secs < interval_secs {
            return Err(ConfigError::WindowShorterThanInterval {
                window: window_secs,
                interval: interval_secs,
            });
        }

        Ok(Self {
            threshold,
            interval_secs,
            window_secs,
            pause,
        })
    }

    /// Requests per second at or above which traffic counts as high.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn interval_secs(&self) -> f64 {
        self.interval_secs
    }

    pub fn window_secs(&self) -> f64 {
        self.window_secs
    }

    /// Interval length as wall-clock time, for pacing.
    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Number of interval counts kept by the rolling window. Always at least 1.
    pub fn window_capacity(&self) -> usize {
        (self.window_secs / self.interval_secs).floor() as usize
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            interval_secs: DEFAULT_INTERVAL_SECS,
            window_secs: DEFAULT_WINDOW_SECS,
            pause: Duration::from_secs(DEFAULT_INTERVAL_SECS as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_twelve_intervals() {
        let config = MonitorConfig::default();
        assert_eq!(config.threshold(), 10.0);
        assert_eq!(config.window_capacity(), 12);
    }

    #[test]
    fn capacity_uses_floor_division() {
        let config = MonitorConfig::new(1.0, 10.0, 25.0).unwrap();
        assert_eq!(config.window_capacity(), 2);
        let config = MonitorConfig::new(1.0, 1.0, 1.0).unwrap();
        assert_eq!(config.window_capacity(), 1);
    }

    #[test]
    fn window_shorter_than_interval_is_rejected() {
        let err = MonitorConfig::new(10.0, 10.0, 5.0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::WindowShorterThanInterval {
                window: 5.0,
                interval: 10.0
            }
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            MonitorConfig::new(-1.0, 10.0, 120.0),
            Err(ConfigError::NegativeThreshold(_))
        ));
        assert!(matches!(
            MonitorConfig::new(10.0, 0.0, 120.0),
            Err(ConfigError::NonPositiveInterval(_))
        ));
        assert!(matches!(
            MonitorConfig::new(f64::NAN, 10.0, 120.0),
            Err(ConfigError::NonFinite { name: "threshold", .. })
        ));
        assert!(matches!(
            MonitorConfig::new(10.0, 10.0, f64::INFINITY),
            Err(ConfigError::NonFinite { name: "log window", .. })
        ));
    }

    #[test]
    fn interval_must_fit_a_duration() {
        assert_eq!(
            MonitorConfig::new(10.0, 1e20, 1e20),
            Err(ConfigError::IntervalTooLong(1e20))
        );
        let config = MonitorConfig::new(10.0, 0.5, 1.0).unwrap();
        assert_eq!(config.pause(), Duration::from_millis(500));
        assert_eq!(MonitorConfig::default().pause(), Duration::from_secs(10));
    }

    #[test]
    fn zero_threshold_is_allowed() {
        assert!(MonitorConfig::new(0.0, 1.0, 1.0).is_ok());
    }
}
