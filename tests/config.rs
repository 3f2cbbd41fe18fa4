use ledgerist::config::Config;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.sync.auto_sync_interval_hours, 6);
    assert!(config.sync.require_unmetered);
    assert!(!config.sync.require_charging);
    assert_eq!(config.cleanup.retention_days, 30);
    assert!(!config.logging.enabled);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Interval below the floor should fail
    config.sync.auto_sync_interval_hours = 0;
    assert!(config.validate().is_err());

    // Reset and test an absurd interval
    config.sync.auto_sync_interval_hours = 2000;
    assert!(config.validate().is_err());

    // Reset and test invalid retention
    config.sync.auto_sync_interval_hours = 6;
    config.cleanup.retention_days = 0;
    assert!(config.validate().is_err());

    // Reset and test invalid log level
    config.cleanup.retention_days = 30;
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("auto_sync_interval_hours = 6"));
    assert!(toml_str.contains("retention_days = 30"));
    assert!(toml_str.contains("require_unmetered = true"));
}

#[test]
fn test_partial_config_deserialization() {
    // Partial TOML configs merge with defaults
    let partial_toml = r#"
[sync]
require_charging = true

[logging]
enabled = true
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();

    // Check that specified values are used
    assert!(config.sync.require_charging);
    assert!(config.logging.enabled);

    // Check that unspecified values use defaults
    assert_eq!(config.sync.auto_sync_interval_hours, 6);
    assert!(config.sync.require_unmetered);
    assert_eq!(config.cleanup.retention_days, 30);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_sync_options_carry_config_values() {
    let mut config = Config::default();
    config.sync.auto_sync_interval_hours = 12;
    config.sync.require_unmetered = false;
    config.sync.require_charging = true;

    let options = config.sync.options();
    assert_eq!(options.interval_hours, 12);
    assert!(!options.require_unmetered);
    assert!(options.require_charging);
}
