//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;

/// Validate the entire configuration.
pub fn validate_config(config: &SocialConfig) -> Result<(), ConfigError> {
    validate_groups_config(&config.groups)?;
    validate_ports_config(&config.ports)?;
    validate_storage_config(&config.storage)?;

    validate_requests_config(&config.requests)?;

    Ok(())
}

fn validate_requests_config(config: &RequestConfig) -> Result<(), ConfigError> {
    if config.timeout > MAX_REQUEST_TIMEOUT {
        return Err(ConfigError::ValidationError(format!(
            "Request timeout must be at most {}s, got {}s",
            MAX_REQUEST_TIMEOUT.as_secs(),
            config.timeout.as_secs()
        )));
    }

    if !config.timeout.is_zero() && config.sweep_interval.is_zero() {
        return Err(ConfigError::ValidationError(
            "Request sweep interval must be greater than 0 when requests expire".to_string(),
        ));
    }
    Ok(())
}

fn validate_cost(group: &str, cost: f64) -> Result<(), ConfigError> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "{} per-use cost must be a non-negative number, got {}",
            group, cost
        )));
    }
    Ok(())
}

/// Validate group settings.
fn validate_groups_config(config: &GroupsConfig) -> Result<(), ConfigError> {
    validate_cost("Friend", config.friend.per_use_cost)?;
    validate_cost("Child", config.child.per_use_cost)?;
    Ok(())
}

fn validate_ports_config(config: &PortsConfig) -> Result<(), ConfigError> {
    if config.call_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Port call timeout must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Validate storage configuration.
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    match config.backend {
        StorageBackend::File => {
            if config.data_dir.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Data directory cannot be empty for file storage".to_string(),
                ));
            }
        }
        StorageBackend::Memory => {}
    }

    Ok(())
}
