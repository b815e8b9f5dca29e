// Grid ladder construction

use tracing::debug;

use crate::core::types::GridLevel;
use crate::error::{TradingError, TradingResult};

/// Fixed ladder of buy levels derived from a reference price
#[derive(Debug, Clone, PartialEq)]
pub struct GridLadder {
    step_pct: f64,
    levels: Vec<GridLevel>,
}

impl GridLadder {
    /// Build `level_count` rungs below `reference_price`, each `step_pct` apart.
    ///
    /// Level `i` buys at `reference_price * (1 - step_pct * (i + 1))` and is
    /// allocated `total_balance / level_count`. Only the level count and the
    /// reference price are checked; a deep ladder may reach non-positive prices.
    pub fn build(
        reference_price: f64,
        level_count: usize,
        step_pct: f64,
        total_balance: f64,
    ) -> TradingResult<Self> {
        if level_count == 0 {
            return Err(TradingError::InvalidConfiguration(
                "level count must be at least 1".to_string(),
            ));
        }
        if !reference_price.is_finite() || reference_price <= 0.0 {
            return Err(TradingError::InvalidConfiguration(format!(
                "reference price must be positive, got {}",
                reference_price
            )));
        }

        let amount = total_balance / level_count as f64;
        let levels: Vec<GridLevel> = (0..level_count)
            .map(|i| GridLevel {
                buy_price: reference_price * (1.0 - step_pct * (i + 1) as f64),
                amount,
                triggered: false,
            })
            .collect();

        debug!(
            "🎯 Grid built from {:.4}: {:?}",
            reference_price,
            levels.iter().map(|l| format!("{:.4}", l.buy_price)).collect::<Vec<_>>()
        );

        Ok(Self { step_pct, levels })
    }

    pub fn step_pct(&self) -> f64 {
        self.step_pct
    }

    pub fn levels(&self) -> &[GridLevel] {
        &self.levels
    }

    pub fn untriggered_count(&self) -> usize {
        self.levels.iter().filter(|l| !l.triggered).count()
    }

    /// Untriggered levels whose trigger threshold `buy_price * (1 - step)` is
    /// at or above `observed_price`, in ladder order.
    pub fn triggerable(&self, observed_price: f64) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, level)| {
                !level.triggered && observed_price <= level.buy_price * (1.0 - self.step_pct)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Mark a level as converted into a position. Returns the level if it was
    /// untriggered; a triggered level is never returned twice.
    pub fn trigger(&mut self, index: usize) -> Option<GridLevel> {
        let level = self.levels.get_mut(index)?;
        if level.triggered {
            return None;
        }
        level.triggered = true;
        Some(level.clone())
    }
}
