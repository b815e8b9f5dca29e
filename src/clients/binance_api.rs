// Binance public ticker API client

use serde::Deserialize;
use tracing::{debug, warn};

use crate::clients::PriceSource;
use crate::config::ExchangeConfig;
use crate::error::{TradingError, TradingResult};

/// One entry of `/api/v3/ticker/price`. Binance sends prices as strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}

impl TickerPrice {
    pub fn price(&self) -> TradingResult<f64> {
        let price: f64 = self.price.parse().map_err(|_| {
            TradingError::price_unavailable(format!(
                "invalid price '{}' for {}",
                self.price, self.symbol
            ))
        })?;
        if !price.is_finite() || price <= 0.0 {
            return Err(TradingError::price_unavailable(format!(
                "non-positive price {} for {}",
                price, self.symbol
            )));
        }
        Ok(price)
    }
}

#[derive(Debug, Clone)]
pub struct BinancePriceClient {
    client: reqwest::Client,
    base_url: String,
}

impl BinancePriceClient {
    pub fn new(config: &ExchangeConfig) -> TradingResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, &config.rest_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn ticker_url(&self) -> String {
        format!("{}/api/v3/ticker/price", self.base_url)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, &str)],
    ) -> TradingResult<T> {
        let response = self
            .client
            .get(self.ticker_url())
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Ticker request {:?} failed with HTTP {}", query, status);
            return Err(TradingError::price_unavailable(format!("HTTP {}", status.as_u16())));
        }

        Ok(response.json::<T>().await?)
    }
}

impl PriceSource for BinancePriceClient {
    async fn latest_price(&self, symbol: &str) -> TradingResult<f64> {
        let ticker: TickerPrice = self.get(&[("symbol", symbol)]).await?;
        let price = ticker.price()?;
        debug!("💰 {} = {:.4}", ticker.symbol, price);
        Ok(price)
    }

    async fn all_prices(&self) -> TradingResult<Vec<TickerPrice>> {
        self.get(&[]).await
    }
}
