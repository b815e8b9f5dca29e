// Common types used across the trading core

use chrono::{DateTime, Utc};
use std::fmt;

/// One rung of the buy ladder
#[derive(Debug, Clone, PartialEq)]
pub struct GridLevel {
    pub buy_price: f64,
    pub amount: f64,    // Notional allocated to this rung
    pub triggered: bool,
}

/// How a position was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyKind {
    Grid,    // Rung trigger, costs the rung's notional
    Manual,  // User buy, costs amount * price
}

/// Capital committed at an entry price, awaiting exit
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub entry_price: f64,
    pub amount: f64,
    pub kind: BuyKind,
    pub opened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub price: f64,
    pub amount: f64,
}

/// Outcome of one engine tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub symbol: String,
    pub observed_price: f64,
    pub buys: Vec<Fill>,
    pub sells: Vec<Fill>,
    pub balance: f64,
}

impl TickReport {
    pub fn has_fills(&self) -> bool {
        !self.buys.is_empty() || !self.sells.is_empty()
    }
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current {} price: {:.2}", self.symbol, self.observed_price)?;
        for buy in &self.buys {
            writeln!(f, "Buy at level {:.2}, amount: {:.2}", buy.price, buy.amount)?;
        }
        for sell in &self.sells {
            writeln!(f, "Sell at level {:.2}, amount: {:.2}", sell.price, sell.amount)?;
        }
        write!(f, "Current balance: {:.2} USD", self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_formatting() {
        let report = TickReport {
            symbol: "BTCUSDT".to_string(),
            observed_price: 97.9,
            buys: vec![Fill { price: 99.0, amount: 50.0 }],
            sells: vec![],
            balance: 50.0,
        };

        let text = report.to_string();
        assert!(text.starts_with("Current BTCUSDT price: 97.90\n"));
        assert!(text.contains("Buy at level 99.00, amount: 50.00\n"));
        assert!(!text.contains("Sell"));
        assert!(text.ends_with("Current balance: 50.00 USD"));
        assert!(report.has_fills());
    }
}
