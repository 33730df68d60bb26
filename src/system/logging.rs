//! Logging system initialization.

use tracing_appender::non_blocking::WorkerGuard;

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber from the logging configuration.
///
/// Logs go to stdout unless a file is configured. Returns the guard of the
/// non-blocking writer; it must be kept alive for the duration of the
/// program so buffered log lines are flushed.
///
/// Call once during startup, after the configuration has been loaded.
/// Panics if a configured log file cannot be opened or if a subscriber was
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let to_stdout = config.file.as_ref().is_none_or(|f| f.is_empty());

    let writer: Box<dyn std::io::Write + Send + Sync> = if to_stdout {
        Box::new(std::io::stdout())
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.file.as_deref().unwrap_or_default())
            .expect("Failed to open log file");
        Box::new(file)
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::new(config.level.clone());

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(to_stdout);

    if config.format == "json" {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }

    guard
}
