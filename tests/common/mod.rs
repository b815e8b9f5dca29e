// Common test utilities and helpers
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use paper_grid_bot::{
    Config, GridConfig, PriceSource, TickerPrice, TradingEngine, TradingError, TradingResult,
};

/// Create a test configuration with sensible defaults and no price noise
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.grid = GridConfig {
        initial_balance: 100.0,
        levels: 2,
        step_pct: 0.01,
        price_noise: 0.0,
    };
    config
}

/// In-memory price source whose prices the test controls
#[derive(Debug, Clone, Default)]
pub struct ScriptedPriceSource {
    prices: Arc<Mutex<Vec<(String, f64)>>>,
    failing: Arc<Mutex<bool>>,
    requests: Arc<Mutex<HashMap<String, usize>>>,
}

impl ScriptedPriceSource {
    pub fn with_price(symbol: &str, price: f64) -> Self {
        let source = Self::default();
        source.set_price(symbol, price);
        source
    }

    pub fn set_price(&self, symbol: &str, price: f64) {
        let mut prices = self.prices.lock().unwrap();
        match prices.iter_mut().find(|(s, _)| s == symbol) {
            Some(entry) => entry.1 = price,
            None => prices.push((symbol.to_string(), price)),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn request_count(&self, symbol: &str) -> usize {
        self.requests.lock().unwrap().get(symbol).copied().unwrap_or(0)
    }
}

impl PriceSource for ScriptedPriceSource {
    async fn latest_price(&self, symbol: &str) -> TradingResult<f64> {
        *self.requests.lock().unwrap().entry(symbol.to_string()).or_insert(0) += 1;
        if *self.failing.lock().unwrap() {
            return Err(TradingError::price_unavailable("HTTP 503"));
        }
        self.prices
            .lock()
            .unwrap()
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, price)| *price)
            .ok_or_else(|| TradingError::price_unavailable(format!("unknown symbol {}", symbol)))
    }

    async fn all_prices(&self) -> TradingResult<Vec<TickerPrice>> {
        if *self.failing.lock().unwrap() {
            return Err(TradingError::price_unavailable("HTTP 503"));
        }
        Ok(self
            .prices
            .lock()
            .unwrap()
            .iter()
            .map(|(symbol, price)| TickerPrice { symbol: symbol.clone(), price: price.to_string() })
            .collect())
    }
}

/// Engine over a scripted source using the test grid configuration
pub fn create_test_engine(source: &ScriptedPriceSource) -> TradingEngine<ScriptedPriceSource> {
    TradingEngine::new(source.clone(), create_test_config().grid)
}
