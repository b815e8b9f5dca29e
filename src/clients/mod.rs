// External API clients

pub mod binance_api;

use std::future::Future;

use crate::error::TradingResult;

pub use binance_api::{BinancePriceClient, TickerPrice};

/// Supplier of latest traded prices
pub trait PriceSource: Send + Sync + 'static {
    /// Latest traded price for `symbol`
    fn latest_price(&self, symbol: &str) -> impl Future<Output = TradingResult<f64>> + Send;

    /// Latest prices for every listed symbol, in exchange order
    fn all_prices(&self) -> impl Future<Output = TradingResult<Vec<TickerPrice>>> + Send;
}

/// Up to `limit` symbols quoted in `quote_suffix`, in exchange order
pub async fn list_symbols<P: PriceSource>(
    source: &P,
    quote_suffix: &str,
    limit: usize,
) -> TradingResult<Vec<String>> {
    let tickers = source.all_prices().await?;
    Ok(tickers
        .into_iter()
        .map(|t| t.symbol)
        .filter(|symbol| symbol.ends_with(quote_suffix))
        .take(limit)
        .collect())
}
