use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// "METHOD /resource [PROTOCOL ...]"
static REQUEST_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<method>\S+)\s+(?P<resource>/\S*)(?:\s+\S+)*\s*$")
        .expect("request line pattern is valid")
});

/// Request field that does not look like `METHOD /path PROTOCOL`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request {0:?} is not of the form \"METHOD /path PROTOCOL\"")]
pub struct MalformedRequest(pub String);

/// Section of a request: the first component of its resource path, with a leading `/`.
pub fn request_section(request: &str) -> Result<String, MalformedRequest> {
    let caps = REQUEST_LINE
        .captures(request)
        .ok_or_else(|| MalformedRequest(request.to_string()))?;
    let resource = &caps["resource"];
    let first = resource[1..].split('/').next().unwrap_or_default();
    Ok(format!("/{first}"))
}

/// One row of the access log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: i64,
    pub byte_count: u64,
    pub request: String,
    section: String,
}

impl LogRecord {
    pub fn new(
        timestamp: i64,
        byte_count: u64,
        request: impl Into<String>,
    ) -> Result<Self, MalformedRequest> {
        let request = request.into();
        let section = request_section(&request)?;
        Ok(Self {
            timestamp,
            byte_count,
            request,
            section,
        })
    }

    pub fn section(&self) -> &str {
        &self.section
    }
}

/// Aggregate of one logical interval.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntervalSummary {
    pub end_timestamp: i64,
    pub average_bytes: f64,
    pub top_section: String,
    pub record_count: u64,
}

/// Everything the monitor reports, in emission order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MonitorEvent {
    Summary {
        end_timestamp: i64,
        average_bytes: f64,
        top_section: String,
    },
    Alert {
        rate: f64,
        timestamp: i64,
    },
    Recovery {
        rate: f64,
        timestamp: i64,
    },
    EndOfStream,
}

impl MonitorEvent {
    pub fn summary(summary: &IntervalSummary) -> Self {
        Self::Summary {
            end_timestamp: summary.end_timestamp,
            average_bytes: summary.average_bytes,
            top_section: summary.top_section.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_is_first_path_component() {
        assert_eq!(request_section("GET /api/v1/foo HTTP/1.0").unwrap(), "/api");
        assert_eq!(request_section("POST /report HTTP/1.1").unwrap(), "/report");
        assert_eq!(request_section("GET /api/user HTTP/1.0").unwrap(), "/api");
    }

    #[test]
    fn section_of_root_and_query() {
        assert_eq!(request_section("GET / HTTP/1.0").unwrap(), "/");
        assert_eq!(request_section("GET /search?q=a HTTP/1.0").unwrap(), "/search?q=a");
    }

    #[test]
    fn protocol_is_optional() {
        assert_eq!(request_section("GET /images/a.png").unwrap(), "/images");
    }

    #[test]
    fn malformed_requests_are_rejected() {
        for bad in ["", "GET", "GET api/user HTTP/1.0", "/api/user"] {
            assert!(request_section(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn record_caches_section() {
        let record = LogRecord::new(1549573860, 1234, "GET /api/user HTTP/1.0").unwrap();
        assert_eq!(record.section(), "/api");
        assert_eq!(record.byte_count, 1234);
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_string(&MonitorEvent::Alert {
            rate: 12.5,
            timestamp: 10,
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"alert","rate":12.5,"timestamp":10}"#);
        let end = serde_json::to_string(&MonitorEvent::EndOfStream).unwrap();
        assert_eq!(end, r#"{"event":"end_of_stream"}"#);
    }
}
