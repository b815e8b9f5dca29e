use std::fmt;

use tokio::sync::oneshot;

use crate::core::TickReport;
use crate::error::{TradingError, TradingResult};

/// Identity of a trading session (the chat it belongs to)
pub type SessionId = i64;

/// Commands sent from the chat layer to a session actor
#[derive(Debug)]
pub enum SessionCommand {
    SelectAsset { symbol: String, respond_to: oneshot::Sender<TradingResult<AssetSelection>> },
    Buy { amount: f64, respond_to: oneshot::Sender<TradingResult<TradeReceipt>> },
    Sell { amount: f64, respond_to: oneshot::Sender<TradingResult<TradeReceipt>> },
    Tick { respond_to: oneshot::Sender<TradingResult<TickReport>> },
    GetBalance { respond_to: oneshot::Sender<f64> },
    GetStatus { respond_to: oneshot::Sender<SessionStatus> },
    /// Responds `false` when autotrade was already running
    StartAutoTrade { respond_to: oneshot::Sender<bool> },
    /// Responds `true` when autotrade was running
    StopAutoTrade { respond_to: oneshot::Sender<bool> },
}

/// Updates pushed by a session without a request, from the autotrade loop
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub session: SessionId,
    pub kind: SessionEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEventKind {
    Report(TickReport),
    TickFailed(TradingError),
    Halted(TradingError),
}

impl SessionEventKind {
    pub fn text(&self) -> String {
        match self {
            SessionEventKind::Report(report) => report.to_string(),
            SessionEventKind::TickFailed(err) => err.user_message(),
            SessionEventKind::Halted(err) => format!("Autotrade stopped. {}", err.user_message()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetSelection {
    pub symbol: String,
    pub price: f64,
    pub ladder_rebuilt: bool,
}

impl fmt::Display for AssetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selected asset: {}\nCurrent price: {:.2} USD", self.symbol, self.price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub symbol: String,
    pub amount: f64,
    pub price: f64,
    pub profit: Option<f64>,   // Set for sells
}

impl fmt::Display for TradeReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.profit {
            None => write!(f, "Bought {} {} at {:.2} USD.", self.amount, self.symbol, self.price),
            Some(profit) => write!(
                f,
                "Sold {} {} at {:.2} USD, profit: {:.2} USD.",
                self.amount, self.symbol, self.price, profit
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub symbol: Option<String>,
    pub auto_trade_active: bool,
    pub balance: f64,
    pub untriggered_levels: usize,
    pub open_positions: usize,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Asset: {}", self.symbol.as_deref().unwrap_or("not selected"))?;
        writeln!(f, "Autotrade: {}", if self.auto_trade_active { "running" } else { "stopped" })?;
        writeln!(f, "Pending grid levels: {}", self.untriggered_levels)?;
        writeln!(f, "Open positions: {}", self.open_positions)?;
        write!(f, "Current balance: {:.2} USD", self.balance)
    }
}
