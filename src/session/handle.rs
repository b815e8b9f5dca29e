use tokio::sync::{mpsc, oneshot};

use crate::core::TickReport;
use crate::error::{TradingError, TradingResult};
use crate::session::commands::{AssetSelection, SessionCommand, SessionStatus, TradeReceipt};

/// Handle for sending commands to one session actor
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn new(command_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { command_tx }
    }

    /// Whether the actor behind this handle has stopped
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand) -> TradingResult<T> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .send(build(tx))
            .await
            .map_err(|_| TradingError::SessionClosed)?;
        rx.await.map_err(|_| TradingError::SessionClosed)
    }

    /// Select an asset, building its grid from the live price
    pub async fn select_asset(&self, symbol: &str) -> TradingResult<AssetSelection> {
        let symbol = symbol.to_string();
        self.request(|respond_to| SessionCommand::SelectAsset { symbol, respond_to })
            .await?
    }

    /// Manual buy at the current exchange price
    pub async fn buy(&self, amount: f64) -> TradingResult<TradeReceipt> {
        self.request(|respond_to| SessionCommand::Buy { amount, respond_to }).await?
    }

    /// Manual sell at the current exchange price
    pub async fn sell(&self, amount: f64) -> TradingResult<TradeReceipt> {
        self.request(|respond_to| SessionCommand::Sell { amount, respond_to }).await?
    }

    /// Run one grid evaluation immediately
    pub async fn tick(&self) -> TradingResult<TickReport> {
        self.request(|respond_to| SessionCommand::Tick { respond_to }).await?
    }

    pub async fn balance(&self) -> TradingResult<f64> {
        self.request(|respond_to| SessionCommand::GetBalance { respond_to }).await
    }

    pub async fn status(&self) -> TradingResult<SessionStatus> {
        self.request(|respond_to| SessionCommand::GetStatus { respond_to }).await
    }

    /// Returns `false` if autotrade was already active
    pub async fn start_auto_trade(&self) -> TradingResult<bool> {
        self.request(|respond_to| SessionCommand::StartAutoTrade { respond_to }).await
    }

    /// Returns `true` if autotrade was active
    pub async fn stop_auto_trade(&self) -> TradingResult<bool> {
        self.request(|respond_to| SessionCommand::StopAutoTrade { respond_to }).await
    }
}
