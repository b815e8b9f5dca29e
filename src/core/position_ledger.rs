// Cash balance and open positions for one trading session

use chrono::Utc;
use tracing::{info, warn};

use crate::core::types::{BuyKind, OpenPosition};
use crate::error::{TradingError, TradingResult};

#[derive(Debug, Clone)]
pub struct PositionLedger {
    cash_balance: f64,
    open_positions: Vec<OpenPosition>,
}

impl PositionLedger {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            cash_balance: initial_balance,
            open_positions: Vec::new(),
        }
    }

    pub fn cash_balance(&self) -> f64 {
        self.cash_balance
    }

    /// Open positions in insertion order
    pub fn open_positions(&self) -> &[OpenPosition] {
        &self.open_positions
    }

    /// Whether some single open position holds at least `amount`
    pub fn has_position_covering(&self, amount: f64) -> bool {
        self.open_positions.iter().any(|p| p.amount >= amount)
    }

    /// Open a position and debit its cost.
    ///
    /// A grid buy costs the rung's notional `amount` and is not funds-checked
    /// here; a manual buy costs `amount * entry_price` and fails with
    /// `InsufficientFunds` when that exceeds the cash balance. Returns the cost.
    pub fn record_buy(&mut self, entry_price: f64, amount: f64, kind: BuyKind) -> TradingResult<f64> {
        validate_amount(amount)?;

        let cost = match kind {
            BuyKind::Grid => amount,
            BuyKind::Manual => {
                let cost = amount * entry_price;
                if cost > self.cash_balance {
                    warn!(
                        "Rejected buy of {} @ {:.4}: cost {:.2} exceeds balance {:.2}",
                        amount, entry_price, cost, self.cash_balance
                    );
                    return Err(TradingError::InsufficientFunds {
                        required: cost,
                        available: self.cash_balance,
                    });
                }
                cost
            }
        };

        self.cash_balance -= cost;
        self.open_positions.push(OpenPosition {
            entry_price,
            amount,
            kind,
            opened_at: Utc::now(),
        });
        Ok(cost)
    }

    /// Close the position at `index` under the grid rule: credit
    /// `amount * (1 + step_pct)` regardless of the actual exit price.
    pub fn close_grid_position(&mut self, index: usize, step_pct: f64) -> Option<OpenPosition> {
        if index >= self.open_positions.len() {
            return None;
        }
        let position = self.open_positions.remove(index);
        self.cash_balance += position.amount * (1.0 + step_pct);
        Some(position)
    }

    /// Sell `amount` out of the first open position large enough to cover it.
    ///
    /// Credits the realized profit `(exit_price - entry_price) * amount`, not
    /// the sale proceeds. Leaves the ledger untouched on error.
    pub fn close_manual_position(&mut self, exit_price: f64, amount: f64) -> TradingResult<f64> {
        validate_amount(amount)?;

        let index = self
            .open_positions
            .iter()
            .position(|p| p.amount >= amount)
            .ok_or(TradingError::InsufficientPosition { requested: amount })?;

        let position = &mut self.open_positions[index];
        let profit = (exit_price - position.entry_price) * amount;
        position.amount -= amount;
        self.cash_balance += profit;

        if position.amount <= 0.0 {
            self.open_positions.remove(index);
        }

        info!("🔴 Manual sell {} @ {:.4}, profit {:.2}", amount, exit_price, profit);
        Ok(profit)
    }
}

fn validate_amount(amount: f64) -> TradingResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(TradingError::InvalidAmount(format!(
            "amount must be a positive number, got {}",
            amount
        )));
    }
    Ok(())
}
