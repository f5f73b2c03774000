use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use http_log_monitor::config::{DEFAULT_INTERVAL_SECS, DEFAULT_THRESHOLD, DEFAULT_WINDOW_SECS};
use http_log_monitor::logging::{LogConfig, init_logging};
use http_log_monitor::{
    ConsoleSink, CsvRecordReader, EventSink, JsonLinesSink, Monitor, MonitorConfig, NoPacing,
    Pacer, RealTimePacing,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Summarize an HTTP access log and alert on high traffic.
#[derive(Debug, Parser)]
#[command(name = "http-log-monitor", version, about)]
struct Cli {
    /// path to your log file
    log_file: PathBuf,

    /// requests per second threshold
    #[arg(short, long, env = "HTTP_MONITOR_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// how often to summarize logs, in seconds of log time
    #[arg(short = 'i', long = "log_interval", env = "HTTP_MONITOR_INTERVAL", default_value_t = DEFAULT_INTERVAL_SECS)]
    log_interval: f64,

    /// time window for alerts, in seconds of log time
    #[arg(short = 'w', long = "log_window", env = "HTTP_MONITOR_WINDOW", default_value_t = DEFAULT_WINDOW_SECS)]
    log_window: f64,

    /// event output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// disable colored labels
    #[arg(long)]
    no_color: bool,

    /// wait one interval of wall-clock time between summaries
    #[arg(long)]
    pace: bool,

    /// more diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
    init_logging(&LogConfig::from_verbosity(cli.verbose, io::stderr().is_terminal()))?;

    // validate before touching the file
    let config = MonitorConfig::new(cli.threshold, cli.log_interval, cli.log_window)
        .context("invalid monitor configuration")?;

    let file = File::open(&cli.log_file)
        .with_context(|| format!("failed to open {}", cli.log_file.display()))?;
    let mut reader = CsvRecordReader::new(BufReader::new(file))
        .with_context(|| format!("failed to read header of {}", cli.log_file.display()))?;
    tracing::info!(path = %cli.log_file.display(), "start monitoring");

    let stdout = io::stdout().lock();
    match (cli.format, cli.pace) {
        (OutputFormat::Text, false) => {
            run(config, ConsoleSink::new(stdout, color), NoPacing, &mut reader).await
        }
        (OutputFormat::Text, true) => {
            run(config, ConsoleSink::new(stdout, color), RealTimePacing, &mut reader).await
        }
        (OutputFormat::Json, false) => {
            run(config, JsonLinesSink::new(stdout), NoPacing, &mut reader).await
        }
        (OutputFormat::Json, true) => {
            run(config, JsonLinesSink::new(stdout), RealTimePacing, &mut reader).await
        }
    }
}

async fn run<S: EventSink, P: Pacer>(
    config: MonitorConfig,
    sink: S,
    pacer: P,
    reader: &mut CsvRecordReader<BufReader<File>>,
) -> Result<()> {
    let mut monitor = Monitor::with_pacer(config, sink, pacer);
    monitor.run(reader).await.context("monitoring aborted")?;
    Ok(())
}
