// Per-chat trading sessions

pub mod actor;
pub mod commands;
pub mod handle;
pub mod registry;

pub use actor::{SessionActor, SessionState};
pub use commands::{
    AssetSelection, SessionCommand, SessionEvent, SessionEventKind, SessionId, SessionStatus,
    TradeReceipt,
};
pub use handle::SessionHandle;
pub use registry::SessionRegistry;
