use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::clients::PriceSource;
use crate::core::TradingEngine;
use crate::session::actor::SessionActor;
use crate::session::commands::{SessionEvent, SessionId};
use crate::session::handle::SessionHandle;

const COMMAND_BUFFER: usize = 32;

/// One session actor per chat, spawned on first use
pub struct SessionRegistry<P> {
    engine: Arc<TradingEngine<P>>,
    sessions: DashMap<SessionId, SessionHandle>,
    events: mpsc::UnboundedSender<SessionEvent>,
    autotrade_interval: Duration,
}

impl<P: PriceSource> SessionRegistry<P> {
    /// Create a registry and the receiver for events from all its sessions
    pub fn new(
        engine: Arc<TradingEngine<P>>,
        autotrade_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let registry = Self {
            engine,
            sessions: DashMap::new(),
            events,
            autotrade_interval,
        };
        (registry, events_rx)
    }

    pub fn engine(&self) -> &Arc<TradingEngine<P>> {
        &self.engine
    }

    /// Handle for the session of `id`, spawning its actor if needed.
    /// Must be called within a tokio runtime.
    pub fn session(&self, id: SessionId) -> SessionHandle {
        let mut entry = self.sessions.entry(id).or_insert_with(|| self.spawn(id));
        if entry.is_closed() {
            debug!("Session {} actor gone, respawning", id);
            *entry = self.spawn(id);
        }
        entry.value().clone()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn spawn(&self, id: SessionId) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let actor = SessionActor::new(
            id,
            self.engine.clone(),
            command_rx,
            self.events.clone(),
            self.autotrade_interval,
        );
        tokio::spawn(actor.run());
        SessionHandle::new(command_tx)
    }
}
