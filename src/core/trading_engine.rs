// Trading engine: one evaluation tick against the ladder and ledger

use rand::Rng;
use tracing::{debug, info, warn};

use crate::clients::PriceSource;
use crate::config::GridConfig;
use crate::core::grid_ladder::GridLadder;
use crate::core::position_ledger::PositionLedger;
use crate::core::types::{BuyKind, Fill, TickReport};
use crate::error::{TradingError, TradingResult};

/// Drives ticks for one session's ladder and ledger using a shared price source
#[derive(Debug, Clone)]
pub struct TradingEngine<P> {
    price_source: P,
    config: GridConfig,
}

impl<P: PriceSource> TradingEngine<P> {
    pub fn new(price_source: P, config: GridConfig) -> Self {
        Self { price_source, config }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn price_source(&self) -> &P {
        &self.price_source
    }

    /// Latest exchange price for the selected symbol
    pub async fn fetch_price(&self, symbol: Option<&str>) -> TradingResult<f64> {
        let symbol = symbol.ok_or_else(TradingError::no_asset_selected)?;
        self.price_source.latest_price(symbol).await
    }

    /// Build a fresh ladder around the current price of `symbol`
    pub async fn build_ladder(&self, symbol: &str) -> TradingResult<(GridLadder, f64)> {
        let price = self.price_source.latest_price(symbol).await?;
        let ladder = GridLadder::build(
            price,
            self.config.levels,
            self.config.step_pct,
            self.config.initial_balance,
        )?;
        Ok((ladder, price))
    }

    /// Apply the synthetic market noise: `price * (1 + δ)`, `δ` uniform in
    /// `[-price_noise, price_noise]`.
    pub fn perturb(&self, price: f64) -> f64 {
        let noise = self.config.price_noise;
        if noise <= 0.0 {
            return price;
        }
        let delta = rand::thread_rng().gen_range(-noise..=noise);
        price * (1.0 + delta)
    }

    /// Run one tick. The price is fetched before anything is mutated, so a
    /// failed fetch leaves the ladder and ledger untouched.
    pub async fn tick(
        &self,
        ladder: &mut GridLadder,
        ledger: &mut PositionLedger,
        symbol: Option<&str>,
    ) -> TradingResult<TickReport> {
        let fetched = self.fetch_price(symbol).await?;
        let observed = self.perturb(fetched);
        debug!("Fetched {:.4}, observed {:.4}", fetched, observed);

        // fetch_price already rejected a missing symbol
        let symbol = symbol.unwrap_or_default();
        Ok(evaluate(ladder, ledger, symbol, observed))
    }
}

/// Evaluate the ladder and ledger against an observed price.
///
/// Buys every untriggered rung whose threshold the price has crossed, then
/// sells every open position whose exit level `entry * (1 + step)` has been
/// reached, scanning positions in insertion order.
pub fn evaluate(
    ladder: &mut GridLadder,
    ledger: &mut PositionLedger,
    symbol: &str,
    observed_price: f64,
) -> TickReport {
    let step = ladder.step_pct();
    let mut buys = Vec::new();
    let mut sells = Vec::new();

    // Grid buys are not funds-checked; the balance may go negative
    for index in ladder.triggerable(observed_price) {
        let level = ladder.levels()[index].clone();
        match ledger.record_buy(level.buy_price, level.amount, BuyKind::Grid) {
            Ok(_) => {
                ladder.trigger(index);
                info!("🟢 Grid buy {} at level {:.4}, amount {:.2}", symbol, level.buy_price, level.amount);
                buys.push(Fill { price: level.buy_price, amount: level.amount });
            }
            Err(err) => warn!("Rung {} at {:.4} not bought: {}", index, level.buy_price, err),
        }
    }

    let mut index = 0;
    while index < ledger.open_positions().len() {
        let position = &ledger.open_positions()[index];
        let sell_price = position.entry_price * (1.0 + step);
        if observed_price >= sell_price {
            if let Some(closed) = ledger.close_grid_position(index, step) {
                info!("🔴 Grid sell {} at level {:.4}, amount {:.2}", symbol, sell_price, closed.amount);
                sells.push(Fill { price: sell_price, amount: closed.amount });
            }
        } else {
            index += 1;
        }
    }

    TickReport {
        symbol: symbol.to_string(),
        observed_price,
        buys,
        sells,
        balance: ledger.cash_balance(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sell_closes_positions_in_insertion_order() {
        let mut ladder = GridLadder::build(100.0, 1, 0.01, 10.0).unwrap();
        ladder.trigger(0);
        let mut ledger = PositionLedger::new(1000.0);
        ledger.record_buy(50.0, 1.0, BuyKind::Manual).unwrap();
        ledger.record_buy(200.0, 1.0, BuyKind::Manual).unwrap();
        ledger.record_buy(60.0, 1.0, BuyKind::Manual).unwrap();

        let report = evaluate(&mut ladder, &mut ledger, "BTCUSDT", 70.0);

        assert_eq!(report.sells.len(), 2);
        assert_eq!(report.sells[0].price, 50.0 * 1.01);
        assert_eq!(report.sells[1].price, 60.0 * 1.01);
        assert_eq!(ledger.open_positions().len(), 1);
        assert_eq!(ledger.open_positions()[0].entry_price, 200.0);
    }

    #[test]
    fn test_rung_with_unusable_amount_stays_untriggered() {
        // A zero balance allocates nothing to each rung
        let mut ladder = GridLadder::build(100.0, 2, 0.01, 0.0).unwrap();
        let mut ledger = PositionLedger::new(100.0);

        let report = evaluate(&mut ladder, &mut ledger, "BTCUSDT", 90.0);

        assert!(report.buys.is_empty());
        assert_eq!(ladder.untriggered_count(), 2);
        assert!(ledger.open_positions().is_empty());
        assert_eq!(ledger.cash_balance(), 100.0);
    }
}
