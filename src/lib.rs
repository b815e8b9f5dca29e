// Paper Grid Trading Bot Library
//
// Simulated grid trading against live exchange prices, driven from Telegram

pub mod core;
pub mod clients;
pub mod config;
pub mod error;     // Unified error handling
pub mod session;   // Per-chat session actors
pub mod bot;       // Telegram transport

// Re-export core trading types
pub use crate::core::{
    evaluate, BuyKind, Fill, GridLadder, GridLevel, OpenPosition, PositionLedger, TickReport,
    TradingEngine,
};

// Re-export error types
pub use error::{PriceFailure, TradingError, TradingResult};

// Re-export client types
pub use clients::{list_symbols, BinancePriceClient, PriceSource, TickerPrice};

// Re-export configuration
pub use config::{AutotradeConfig, Config, ConfigError, ExchangeConfig, GridConfig, TelegramConfig};

// Re-export session types
pub use session::{
    AssetSelection, SessionEvent, SessionEventKind, SessionHandle, SessionId, SessionRegistry,
    SessionStatus, TradeReceipt,
};
