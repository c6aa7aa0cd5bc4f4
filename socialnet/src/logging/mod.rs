//! Structured logging for socialnet.
//!
//! Installs a `tracing` subscriber writing pretty, compact or JSON lines to
//! stdout or a log file. `RUST_LOG` overrides the configured level when set.


use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

/// Error type for logging operations
#[derive(Debug)]
pub enum LogError {
    /// IO error occurred
    IoError(std::io::Error),

    /// Error parsing log level
    InvalidLogLevel(String),

    /// Error in subscriber setup
    SubscriberError(Box<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::IoError(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for LogError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        LogError::SubscriberError(err)
    }
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the logging system with the given configuration.
///
/// When logging to a file the returned guard must be kept alive; dropping it
/// flushes and stops the background writer. Calling this a second time is a
/// no-op that returns `Ok(None)`.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    if tracing::dispatcher::has_been_set() {
        return Ok(None);
    }

    if !has_sink(config) {
        return Ok(None);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let (writer, guard) = match (&config.file, config.stdout) {
        (Some(path), false) => {
            let (writer, guard) = create_non_blocking_file(path)?;
            (Some(writer), Some(guard))
        }
        _ => (None, None),
    };

    let result = match config.format {
        LogFormat::Json => init_json_logging(filter, writer),
        LogFormat::Compact => init_compact_logging(filter, writer),
        LogFormat::Pretty | LogFormat::Default => init_pretty_logging(filter, writer),
    };

    // Another thread may have won the race to install a subscriber
    if let Err(LogError::SubscriberError(_)) = result
        && tracing::dispatcher::has_been_set()
    {
        return Ok(None);
    }

    result.map(|_| guard)
}

/// Whether the configuration sends logs anywhere
fn has_sink(config: &LoggingConfig) -> bool {
    config.stdout || config.file.is_some()
}

fn init_json_logging(filter: EnvFilter, writer: Option<NonBlocking>) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_thread_ids(true);

    match writer {
        Some(writer) => subscriber.with_writer(writer).try_init()?,
        None => subscriber.try_init()?,
    }
    Ok(())
}

fn init_compact_logging(filter: EnvFilter, writer: Option<NonBlocking>) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    match writer {
        Some(writer) => subscriber.with_writer(writer).try_init()?,
        None => subscriber.try_init()?,
    }
    Ok(())
}

fn init_pretty_logging(filter: EnvFilter, writer: Option<NonBlocking>) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    match writer {
        Some(writer) => subscriber.with_writer(writer).try_init()?,
        None => subscriber.try_init()?,
    }
    Ok(())
}

/// Create a non-blocking file writer.
fn create_non_blocking_file(path: impl AsRef<Path>) -> Result<(NonBlocking, WorkerGuard)> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file_name = path.file_name().ok_or_else(|| {
        LogError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Log path has no file name: {}", path.display()),
        ))
    })?;

    let file_appender = tracing_appender::rolling::never(
        path.parent().unwrap_or_else(|| Path::new(".")),
        file_name,
    );

    Ok(tracing_appender::non_blocking(file_appender))
}

/// Parse a log level string into a LogLevel enum.
pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    level.parse().map_err(LogError::InvalidLogLevel)
}

/// Convert a LogLevel to a tracing::Level.
pub fn log_level_to_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

/// Convert a tracing::Level to a LogLevel enum.
pub fn level_to_log_level(level: Level) -> LogLevel {
    match level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::IoError(e) => write!(f, "IO error: {}", e),
            LogError::SubscriberError(e) => write!(f, "Subscriber error: {}", e),
            LogError::InvalidLogLevel(s) => write!(f, "Invalid log level: {}", s),
        }
    }
}

impl std::error::Error for LogError {}
