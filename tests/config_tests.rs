// Integration tests for configuration loading and validation

use paper_grid_bot::{Config, ConfigError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_or_create_writes_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    assert!(!config_path.exists());

    let config = Config::load_or_create(&config_path).expect("Failed to create config");

    assert!(config_path.exists());
    assert_eq!(config.grid.initial_balance, 100.0);
    assert_eq!(config.grid.levels, 10);
    assert_eq!(config.autotrade.interval_secs, 5);

    // Second call reads the file it just wrote
    let reloaded = Config::load_or_create(&config_path).expect("Failed to reload config");
    assert_eq!(reloaded.exchange.rest_url, config.exchange.rest_url);
}

#[test]
fn test_config_file_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("bot.toml");

    let mut config = Config::default();
    config.grid.levels = 5;
    config.grid.step_pct = 0.02;
    config.exchange.quote_suffix = "BTC".to_string();
    config.to_file(&config_path).expect("Failed to write config");

    let loaded = Config::from_file(&config_path).expect("Failed to load config");

    assert_eq!(loaded.grid.levels, 5);
    assert_eq!(loaded.grid.step_pct, 0.02);
    assert_eq!(loaded.exchange.quote_suffix, "BTC");
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("bad.toml");

    let mut config = Config::default();
    config.grid.levels = 0;
    config.to_file(&config_path).expect("Failed to write config");

    let err = Config::from_file(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_validation_rules() {
    let mut config = Config::default();
    config.grid.step_pct = 1.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.grid.price_noise = -0.1;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.autotrade.interval_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.grid.initial_balance = 0.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_unparseable_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[grid\nlevels = ").expect("Failed to write file");

    assert!(matches!(Config::from_file(&config_path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_missing_token_reported() {
    let mut config = Config::default();
    config.telegram.token_env = "PAPER_GRID_BOT_TEST_UNSET_TOKEN".to_string();

    let err = config.telegram_token().unwrap_err();
    assert!(matches!(err, ConfigError::MissingToken(ref var) if var == "PAPER_GRID_BOT_TEST_UNSET_TOKEN"));
}
