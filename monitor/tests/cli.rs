//! End-to-end runs of the `http-log-monitor` binary.

use std::path::PathBuf;

use assert_cmd::Command;
use http_log_monitor::MonitorEvent;
use predicates::prelude::*;

fn sample_log() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_access.csv")
}

#[allow(deprecated)]
fn monitor_cmd() -> Command {
    let mut cmd = Command::cargo_bin("http-log-monitor").expect("binary should be built");
    cmd.env_remove("HTTP_MONITOR_THRESHOLD")
        .env_remove("HTTP_MONITOR_INTERVAL")
        .env_remove("HTTP_MONITOR_WINDOW")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_flags() {
    monitor_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("--log_interval"))
        .stdout(predicate::str::contains("--log_window"));
}

#[test]
fn burst_in_sample_log_alerts_and_recovers() {
    monitor_cmd()
        .arg(sample_log())
        .args(["--threshold", "2", "--log_interval", "10", "--log_window", "20"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("INFO 1549573870\t"))
        .stdout(predicate::str::contains("ERROR High traffic generated an alert"))
        .stdout(predicate::str::contains("SUCCESS Traffic has stabilized"))
        .stdout(predicate::str::ends_with("WARNING End of file has been reached.\n"));
}

#[test]
fn alerts_stay_off_stderr_by_default() {
    monitor_cmd()
        .arg(sample_log())
        .args(["-t", "2", "-w", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ERROR High traffic"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn default_threshold_stays_quiet_on_sample_log() {
    monitor_cmd()
        .arg(sample_log())
        .assert()
        .success()
        .stdout(predicate::str::contains("High traffic").not())
        .stdout(predicate::str::contains("End of file has been reached."));
}

#[test]
fn json_output_is_one_event_per_line() {
    let output = monitor_cmd()
        .arg(sample_log())
        .args(["--format", "json", "-t", "2", "-w", "20"])
        .output()
        .expect("run monitor");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let events: Vec<MonitorEvent> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json event"))
        .collect();
    assert!(events.iter().any(|e| matches!(e, MonitorEvent::Alert { .. })));
    assert_eq!(events.last(), Some(&MonitorEvent::EndOfStream));
}

#[test]
fn threshold_can_come_from_environment() {
    monitor_cmd()
        .env("HTTP_MONITOR_THRESHOLD", "0")
        .arg(sample_log())
        .assert()
        .success()
        .stdout(predicate::str::contains("ERROR High traffic generated an alert"));
}

#[test]
fn window_shorter_than_interval_fails_fast() {
    monitor_cmd()
        .arg(sample_log())
        .args(["--log_interval", "10", "--log_window", "5"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("must be at least the log interval"));
}

#[test]
fn interval_too_long_for_a_duration_fails_fast() {
    monitor_cmd()
        .arg(sample_log())
        .args(["--log_interval", "1e20", "--log_window", "1e20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is too long"));
}

#[test]
fn missing_file_fails() {
    monitor_cmd()
        .arg("/nonexistent/access.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}

#[test]
fn malformed_log_fails_with_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "date,bytes,request\n1,10,GET /a HTTP/1.0\n2,10,nonsense\n").unwrap();

    monitor_cmd()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}
