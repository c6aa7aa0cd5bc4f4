//! Configuration model definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure for socialnet.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SocialConfig {
    /// Per-group limits and costs
    pub groups: GroupsConfig,

    /// Pending request lifetime
    pub requests: RequestConfig,

    /// Outbound port behavior
    pub ports: PortsConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Shortcut for debug-level logging, overrides `logging.level`
    pub debug: bool,
}

impl SocialConfig {
    /// The effective logging configuration, with the `debug` shortcut applied
    pub fn effective_logging(&self) -> LoggingConfig {
        let mut logging = self.logging.clone();
        if self.debug {
            logging.level = LogLevel::Debug;
        }
        logging
    }
}

/// Settings for every group kind.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GroupsConfig {
    pub friend: FriendSettings,
    pub child: ChildSettings,
}

/// Friend group settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FriendSettings {
    /// Most friends one person may have, 0 for unlimited
    pub maximum_friends: u32,

    /// Currency charged to the requester when a friendship is established
    pub per_use_cost: f64,
}

impl Default for FriendSettings {
    fn default() -> Self {
        Self {
            maximum_friends: 0,
            per_use_cost: 0.0,
        }
    }
}

/// Child group settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChildSettings {
    /// Most children one person may have, 0 for unlimited
    pub maximum_children: u32,

    /// Currency charged to the parent when the relationship is established
    pub per_use_cost: f64,
}

impl Default for ChildSettings {
    fn default() -> Self {
        Self {
            maximum_children: 0,
            per_use_cost: 0.0,
        }
    }
}

/// Longest accepted request timeout
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Pending request lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RequestConfig {
    /// How long a request stays pending, `0s` for forever
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// How often the background sweeper prunes expired requests
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl RequestConfig {
    /// The request lifetime, or `None` when requests never expire
    pub fn ttl(&self) -> Option<chrono::Duration> {
        if self.timeout.is_zero() {
            return None;
        }
        // Validation caps the timeout, so the conversion cannot fail
        chrono::Duration::from_std(self.timeout.min(MAX_REQUEST_TIMEOUT)).ok()
    }
}

/// Outbound port behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortsConfig {
    /// Upper bound for any single notification, sync, lookup or charge call
    pub call_timeout_ms: u64,
}

impl Default for PortsConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 2000,
        }
    }
}

impl PortsConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

/// Configuration for storage components.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which backend holds person records
    pub backend: StorageBackend,

    /// Base directory for file storage
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = directories::ProjectDirs::from("org", "socialnet", "socialnet")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"));

        Self {
            backend: StorageBackend::File,
            data_dir,
        }
    }
}

impl StorageConfig {
    /// Directory holding one file per player
    pub fn people_dir(&self) -> PathBuf {
        self.data_dir.join("people")
    }
}

/// Person store backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-memory, lost on restart
    Memory,

    /// One JSON file per player
    File,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// File to log to (if any)
    pub file: Option<PathBuf>,

    /// Whether to log to stdout
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Default,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level
    Trace,

    /// Debug level
    Debug,

    /// Info level
    Info,

    /// Warn level
    Warn,

    /// Error level
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default format
    Default,

    /// JSON format
    Json,

    /// Compact format
    Compact,

    /// Pretty format
    Pretty,
}
