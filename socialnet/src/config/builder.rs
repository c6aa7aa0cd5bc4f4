//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builder for creating SocialConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: SocialConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: SocialConfig::default(),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: SocialConfig) -> Self {
        Self { config }
    }

    /// Set the base data directory.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Keep person records in memory only
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.backend = StorageBackend::Memory;
        self
    }

    /// Keep person records as JSON files under the data directory
    pub fn with_file_storage(mut self) -> Self {
        self.config.storage.backend = StorageBackend::File;
        self
    }

    /// Cap the number of friends per person, 0 for unlimited
    pub fn with_maximum_friends(mut self, maximum: u32) -> Self {
        self.config.groups.friend.maximum_friends = maximum;
        self
    }

    /// Cap the number of children per person, 0 for unlimited
    pub fn with_maximum_children(mut self, maximum: u32) -> Self {
        self.config.groups.child.maximum_children = maximum;
        self
    }

    pub fn with_friend_cost(mut self, cost: f64) -> Self {
        self.config.groups.friend.per_use_cost = cost;
        self
    }

    pub fn with_child_cost(mut self, cost: f64) -> Self {
        self.config.groups.child.per_use_cost = cost;
        self
    }

    /// How long requests stay pending, `Duration::ZERO` for forever
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.requests.timeout = timeout;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.config.requests.sweep_interval = interval;
        self
    }

    pub fn with_port_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.ports.call_timeout_ms = timeout_ms;
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Log to a file instead of stdout
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self.config.logging.stdout = false;
        self
    }

    /// Enable the debug shortcut
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Create a configuration for development.
    ///
    /// - In-memory storage
    /// - Requests never expire
    /// - Debug-level logging
    pub fn development() -> Self {
        Self::new()
            .with_memory_storage()
            .with_request_timeout(Duration::ZERO)
            .with_log_level(LogLevel::Debug)
    }

    /// Create a configuration for testing.
    pub fn testing() -> Self {
        Self::development()
            .with_data_dir(PathBuf::from("./test_data"))
            .with_port_timeout_ms(500)
    }

    /// Create a production-ready configuration with persistent storage.
    pub fn production() -> Self {
        Self::new()
            .with_file_storage()
            .with_log_level(LogLevel::Info)
            .with_log_format(LogFormat::Compact)
    }

    /// Build the configuration, validating it first.
    pub fn build(self) -> Result<SocialConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
