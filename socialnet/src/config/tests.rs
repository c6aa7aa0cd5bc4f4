use crate::config::{
    ConfigBuilder, ConfigError, ConfigLoader, LogLevel, MAX_REQUEST_TIMEOUT, SocialConfig,
    StorageBackend, validation,
};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = SocialConfig::default();
    assert_eq!(config.groups.friend.maximum_friends, 0);
    assert_eq!(config.groups.child.maximum_children, 0);
    assert_eq!(config.groups.friend.per_use_cost, 0.0);
    assert_eq!(config.storage.backend, StorageBackend::File);
    assert_eq!(config.requests.timeout, Duration::from_secs(600));
    assert_eq!(config.logging.level, LogLevel::Info);
    assert!(validation::validate_config(&config).is_ok());
}

#[test]
fn test_builder_sets_group_limits() {
    let config = ConfigBuilder::new()
        .with_memory_storage()
        .with_maximum_friends(5)
        .with_maximum_children(2)
        .with_friend_cost(10.0)
        .with_child_cost(25.5)
        .build()
        .unwrap();

    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.groups.friend.maximum_friends, 5);
    assert_eq!(config.groups.child.maximum_children, 2);
    assert_eq!(config.groups.friend.per_use_cost, 10.0);
    assert_eq!(config.groups.child.per_use_cost, 25.5);
}

#[test]
fn test_validation_rejects_bad_costs() {
    let negative = ConfigBuilder::new().with_friend_cost(-1.0).build();
    assert!(matches!(negative, Err(ConfigError::ValidationError(_))));

    let nan = ConfigBuilder::new().with_child_cost(f64::NAN).build();
    assert!(matches!(nan, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_validation_rejects_zero_port_timeout() {
    let result = ConfigBuilder::new().with_port_timeout_ms(0).build();
    assert!(result.is_err());
}

#[test]
fn test_validation_bounds_request_timeout() {
    let huge = ConfigBuilder::new()
        .with_request_timeout(Duration::from_secs(300_000 * 365 * 24 * 60 * 60))
        .build();
    assert!(matches!(huge, Err(ConfigError::ValidationError(_))));

    let longest = ConfigBuilder::new()
        .with_request_timeout(MAX_REQUEST_TIMEOUT)
        .build()
        .unwrap();
    assert_eq!(longest.requests.ttl(), Some(chrono::Duration::days(365)));
}

#[test]
fn test_validation_rejects_empty_data_dir_for_files() {
    let result = ConfigBuilder::new()
        .with_file_storage()
        .with_data_dir("")
        .build();
    assert!(result.is_err());

    // Memory storage never touches the directory
    let result = ConfigBuilder::new()
        .with_memory_storage()
        .with_data_dir("")
        .build();
    assert!(result.is_ok());
}

#[test]
fn test_predefined_configs() {
    let dev = ConfigBuilder::development().build().unwrap();
    let test = ConfigBuilder::testing().build().unwrap();
    let prod = ConfigBuilder::production().build().unwrap();

    assert_eq!(dev.storage.backend, StorageBackend::Memory);
    assert_eq!(dev.logging.level, LogLevel::Debug);
    assert!(dev.requests.ttl().is_none());

    assert_eq!(test.storage.data_dir, PathBuf::from("./test_data"));
    assert_eq!(test.ports.call_timeout_ms, 500);

    assert_eq!(prod.storage.backend, StorageBackend::File);
    assert_eq!(prod.logging.level, LogLevel::Info);
    assert!(prod.requests.ttl().is_some());
}

#[test]
fn test_debug_shortcut() {
    let config = ConfigBuilder::production().with_debug(true).build().unwrap();
    assert_eq!(config.logging.level, LogLevel::Info);
    assert_eq!(config.effective_logging().level, LogLevel::Debug);
}

#[test]
fn test_load_toml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("socialnet.toml");
    std::fs::write(
        &path,
        r#"
debug = true

[groups.friend]
maximum_friends = 20
per_use_cost = 5.0

[groups.child]
maximum_children = 3

[requests]
timeout = "2m 30s"

[storage]
backend = "memory"
"#,
    )
    .unwrap();

    let config = ConfigLoader::new().load_file(&path).unwrap().extract().unwrap();

    assert!(config.debug);
    assert_eq!(config.groups.friend.maximum_friends, 20);
    assert_eq!(config.groups.friend.per_use_cost, 5.0);
    assert_eq!(config.groups.child.maximum_children, 3);
    assert_eq!(config.groups.child.per_use_cost, 0.0);
    assert_eq!(config.requests.timeout, Duration::from_secs(150));
    assert_eq!(config.requests.sweep_interval, Duration::from_secs(60));
    assert_eq!(config.storage.backend, StorageBackend::Memory);
}

#[test]
fn test_load_file_errors() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        ConfigLoader::new().load_file(&missing),
        Err(ConfigError::FileLoadError(_))
    ));

    let unsupported = dir.path().join("config.ini");
    std::fs::write(&unsupported, "x=1").unwrap();
    assert!(matches!(
        ConfigLoader::new().load_file(&unsupported),
        Err(ConfigError::FileLoadError(_))
    ));
}

#[test]
fn test_loaded_values_are_validated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("socialnet.json");
    std::fs::write(&path, r#"{ "groups": { "friend": { "per_use_cost": -3.0 } } }"#).unwrap();

    let result = ConfigLoader::new().load_file(&path).unwrap().extract();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_config_serialization() {
    let config = ConfigBuilder::new()
        .with_data_dir("/tmp/socialnet")
        .with_maximum_friends(7)
        .with_request_timeout(Duration::from_secs(90))
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: SocialConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(config.storage.data_dir, deserialized.storage.data_dir);
    assert_eq!(config.groups, deserialized.groups);
    assert_eq!(config.requests, deserialized.requests);
}
