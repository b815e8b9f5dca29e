// Configuration management for the paper grid bot

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_initial_balance")]
    pub initial_balance: f64,
    #[serde(default = "default_levels")]
    pub levels: usize,
    #[serde(default = "default_step_pct")]
    pub step_pct: f64,          // Fraction, 0.01 = 1%
    #[serde(default = "default_price_noise")]
    pub price_noise: f64,       // Max synthetic perturbation, 0.05 = ±5%
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    #[serde(default = "default_quote_suffix")]
    pub quote_suffix: String,
    #[serde(default = "default_asset_list_limit")]
    pub asset_list_limit: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutotradeConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Environment variable holding the bot token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub grid: GridConfig,
    pub exchange: ExchangeConfig,
    pub autotrade: AutotradeConfig,
    pub telegram: TelegramConfig,
}

// Default value functions
fn default_initial_balance() -> f64 { 100.0 }
fn default_levels() -> usize { 10 }
fn default_step_pct() -> f64 { 0.01 }
fn default_price_noise() -> f64 { 0.05 }
fn default_rest_url() -> String { "https://api.binance.com".to_string() }
fn default_quote_suffix() -> String { "USDT".to_string() }
fn default_asset_list_limit() -> usize { 10 }
fn default_request_timeout() -> u64 { 10 }
fn default_interval() -> u64 { 5 }
fn default_token_env() -> String { "TELOXIDE_TOKEN".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            levels: default_levels(),
            step_pct: default_step_pct(),
            price_noise: default_price_noise(),
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            quote_suffix: default_quote_suffix(),
            asset_list_limit: default_asset_list_limit(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for AutotradeConfig {
    fn default() -> Self {
        Self { interval_secs: default_interval() }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self { token_env: default_token_env() }
    }
}

impl AutotradeConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl ExchangeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or create default if file doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(&path)?;
            info!("📁 Created default config file: {}", path.as_ref().display());
            Ok(config)
        }
    }

    /// Read the bot token from the configured environment variable
    pub fn telegram_token(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.telegram.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(ConfigError::MissingToken(self.telegram.token_env.clone())),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.initial_balance <= 0.0 || !self.grid.initial_balance.is_finite() {
            return Err(ConfigError::Validation("initial_balance must be positive".to_string()));
        }

        if self.grid.levels == 0 {
            return Err(ConfigError::Validation("levels must be greater than 0".to_string()));
        }

        if self.grid.step_pct <= 0.0 || self.grid.step_pct >= 1.0 {
            return Err(ConfigError::Validation("step_pct must be between 0 and 1".to_string()));
        }

        // The deepest rung must still have a positive price
        if self.grid.step_pct * self.grid.levels as f64 >= 1.0 {
            return Err(ConfigError::Validation(
                "step_pct * levels must be below 1".to_string()
            ));
        }

        if self.grid.price_noise < 0.0 || self.grid.price_noise >= 1.0 {
            return Err(ConfigError::Validation("price_noise must be in [0, 1)".to_string()));
        }

        if self.exchange.rest_url.is_empty() {
            return Err(ConfigError::Validation("rest_url must not be empty".to_string()));
        }

        if self.exchange.asset_list_limit == 0 {
            return Err(ConfigError::Validation("asset_list_limit must be greater than 0".to_string()));
        }

        if self.autotrade.interval_secs == 0 {
            return Err(ConfigError::Validation("interval_secs must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Bot token not set: export {0} or add it to .env")]
    MissingToken(String),
}
