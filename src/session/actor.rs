// Session actor: the single owner of one chat's ladder, ledger and flags
//
// Every mutation, manual or from the autotrade loop, runs on this task, so a
// manual trade can never interleave with a grid tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::clients::PriceSource;
use crate::core::{BuyKind, GridLadder, PositionLedger, TickReport, TradingEngine};
use crate::error::{TradingError, TradingResult};
use crate::session::commands::{
    AssetSelection, SessionCommand, SessionEvent, SessionEventKind, SessionStatus, TradeReceipt,
};

#[derive(Debug)]
pub struct SessionState {
    pub symbol: Option<String>,
    pub ladder: Option<GridLadder>,
    pub ledger: PositionLedger,
    pub auto_trade_active: bool,
}

impl SessionState {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            symbol: None,
            ladder: None,
            ledger: PositionLedger::new(initial_balance),
            auto_trade_active: false,
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            symbol: self.symbol.clone(),
            auto_trade_active: self.auto_trade_active,
            balance: self.ledger.cash_balance(),
            untriggered_levels: self.ladder.as_ref().map_or(0, |l| l.untriggered_count()),
            open_positions: self.ledger.open_positions().len(),
        }
    }
}

pub struct SessionActor<P> {
    id: i64,
    engine: Arc<TradingEngine<P>>,
    state: SessionState,
    commands: mpsc::Receiver<SessionCommand>,
    events: mpsc::UnboundedSender<SessionEvent>,
    autotrade_interval: Duration,
}

impl<P: PriceSource> SessionActor<P> {
    pub fn new(
        id: i64,
        engine: Arc<TradingEngine<P>>,
        commands: mpsc::Receiver<SessionCommand>,
        events: mpsc::UnboundedSender<SessionEvent>,
        autotrade_interval: Duration,
    ) -> Self {
        let state = SessionState::new(engine.config().initial_balance);
        Self { id, engine, state, commands, events, autotrade_interval }
    }

    /// Process commands and autotrade ticks until every handle is dropped
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.autotrade_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Session {} started", self.id);

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command, &mut ticker).await,
                    None => break,
                },
                _ = ticker.tick(), if self.state.auto_trade_active => {
                    self.autotrade_step().await;
                }
            }
        }

        info!("Session {} closed", self.id);
    }

    async fn handle_command(&mut self, command: SessionCommand, ticker: &mut Interval) {
        match command {
            SessionCommand::SelectAsset { symbol, respond_to } => {
                let result = self.select_asset(symbol).await;
                let _ = respond_to.send(result);
            }
            SessionCommand::Buy { amount, respond_to } => {
                let result = self.buy(amount).await;
                let _ = respond_to.send(result);
            }
            SessionCommand::Sell { amount, respond_to } => {
                let result = self.sell(amount).await;
                let _ = respond_to.send(result);
            }
            SessionCommand::Tick { respond_to } => {
                let result = self.tick().await;
                let _ = respond_to.send(result);
            }
            SessionCommand::GetBalance { respond_to } => {
                let _ = respond_to.send(self.state.ledger.cash_balance());
            }
            SessionCommand::GetStatus { respond_to } => {
                let _ = respond_to.send(self.state.status());
            }
            SessionCommand::StartAutoTrade { respond_to } => {
                let started = !self.state.auto_trade_active;
                if started {
                    self.state.auto_trade_active = true;
                    // First tick runs right away, then every interval
                    ticker.reset_immediately();
                    info!("▶️  Session {} autotrade started", self.id);
                }
                let _ = respond_to.send(started);
            }
            SessionCommand::StopAutoTrade { respond_to } => {
                let was_active = self.state.auto_trade_active;
                self.state.auto_trade_active = false;
                if was_active {
                    info!("⏹️  Session {} autotrade stopped", self.id);
                }
                let _ = respond_to.send(was_active);
            }
        }
    }

    async fn select_asset(&mut self, symbol: String) -> TradingResult<AssetSelection> {
        // Reselecting the current asset keeps the in-flight grid
        if self.state.symbol.as_deref() == Some(symbol.as_str()) && self.state.ladder.is_some() {
            let price = self.engine.fetch_price(Some(&symbol)).await?;
            return Ok(AssetSelection { symbol, price, ladder_rebuilt: false });
        }

        let (ladder, price) = self.engine.build_ladder(&symbol).await?;
        info!(
            "🎯 Session {} selected {} @ {:.4} ({} levels)",
            self.id,
            symbol,
            price,
            ladder.levels().len()
        );
        self.state.ladder = Some(ladder);
        self.state.symbol = Some(symbol.clone());
        Ok(AssetSelection { symbol, price, ladder_rebuilt: true })
    }

    async fn buy(&mut self, amount: f64) -> TradingResult<TradeReceipt> {
        let symbol = self.state.symbol.clone().ok_or_else(TradingError::no_asset_selected)?;
        let price = self.engine.fetch_price(Some(&symbol)).await?;
        self.state.ledger.record_buy(price, amount, BuyKind::Manual)?;
        info!("🟢 Session {} bought {} {} @ {:.4}", self.id, amount, symbol, price);
        Ok(TradeReceipt { symbol, amount, price, profit: None })
    }

    async fn sell(&mut self, amount: f64) -> TradingResult<TradeReceipt> {
        let symbol = self.state.symbol.clone().ok_or_else(TradingError::no_asset_selected)?;
        if !self.state.ledger.has_position_covering(amount) {
            return Err(TradingError::InsufficientPosition { requested: amount });
        }
        let price = self.engine.fetch_price(Some(&symbol)).await?;
        let profit = self.state.ledger.close_manual_position(price, amount)?;
        Ok(TradeReceipt { symbol, amount, price, profit: Some(profit) })
    }

    async fn tick(&mut self) -> TradingResult<TickReport> {
        let state = &mut self.state;
        let ladder = state.ladder.as_mut().ok_or_else(TradingError::no_asset_selected)?;
        self.engine.tick(ladder, &mut state.ledger, state.symbol.as_deref()).await
    }

    async fn autotrade_step(&mut self) {
        let kind = match self.tick().await {
            Ok(report) => {
                debug!("Session {} tick: {} buys, {} sells", self.id, report.buys.len(), report.sells.len());
                SessionEventKind::Report(report)
            }
            Err(err) if err.halts_autotrade() => {
                self.state.auto_trade_active = false;
                warn!("Session {} autotrade halted: {}", self.id, err);
                SessionEventKind::Halted(err)
            }
            Err(err) => {
                warn!("Session {} tick failed [{}]: {}", self.id, err.category(), err);
                SessionEventKind::TickFailed(err)
            }
        };

        if self.events.send(SessionEvent { session: self.id, kind }).is_err() {
            debug!("Session {} has no event listener", self.id);
        }
    }
}
