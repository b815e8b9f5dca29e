// Core trading logic modules

pub mod types;
pub mod grid_ladder;
pub mod position_ledger;
pub mod trading_engine;

// Re-export commonly used types
pub use types::{BuyKind, Fill, GridLevel, OpenPosition, TickReport};
pub use grid_ladder::GridLadder;
pub use position_ledger::PositionLedger;
pub use trading_engine::{evaluate, TradingEngine};
