//! In-memory transport for tests.
//!
//! [`MockConnector`] hands out [`MockChannel`]s that never touch the network.
//! The paired [`MockTransport`] handle plays the remote side: it decides when
//! a channel opens, closes, or fails, injects inbound frames, and records every
//! frame the controller sent.
//!
//! # Usage in tests
//!
//! ```ignore
//! let (connector, transport) = MockConnector::new();
//! let (mut manager, mut events) = ConnectionManager::new(Box::new(connector));
//!
//! manager.connect();
//! transport.accept(0);
//! while let Ok(ev) = events.try_recv() {
//!     manager.handle_event(ev);
//! }
//!
//! manager.send("CLICK".to_string());
//! assert_eq!(transport.sent(0), vec!["CLICK"]);
//! ```
//!
//! Like a browser WebSocket, a mock channel reports `Closed` exactly once,
//! whether the close came from the controller or from the remote side.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use remote_pad_core::ChannelSignal;

use crate::application::connection_manager::{
    Channel, ChannelEvent, ChannelEventSender, ChannelId, Connector, ReadyState, TransportError,
};

struct ChannelRecord {
    events: ChannelEventSender,
    ready: ReadyState,
    sent: Vec<String>,
    closed: bool,
}

impl ChannelRecord {
    fn emit(&self, event: ChannelEvent) {
        // The manager may already be gone; the event is then irrelevant.
        let _ = self.events.send(event);
    }

    fn finish(&mut self, id: ChannelId) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.ready = ReadyState::Closed;
        self.emit(ChannelEvent::signal(id, ChannelSignal::Closed));
    }
}

#[derive(Default)]
struct Shared {
    channels: BTreeMap<ChannelId, ChannelRecord>,
    opens: usize,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A connector that opens in-memory channels.
pub struct MockConnector {
    shared: Arc<Mutex<Shared>>,
}

impl MockConnector {
    /// Creates a connector and the handle that controls its channels.
    pub fn new() -> (Self, MockTransport) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MockTransport { shared },
        )
    }
}

impl Connector for MockConnector {
    fn open(&self, id: ChannelId, events: ChannelEventSender) -> Box<dyn Channel> {
        let mut shared = lock(&self.shared);
        shared.opens += 1;
        shared.channels.insert(
            id,
            ChannelRecord {
                events,
                ready: ReadyState::Connecting,
                sent: Vec::new(),
                closed: false,
            },
        );
        Box::new(MockChannel {
            id,
            shared: Arc::clone(&self.shared),
        })
    }
}

/// One in-memory channel.
pub struct MockChannel {
    id: ChannelId,
    shared: Arc<Mutex<Shared>>,
}

impl Channel for MockChannel {
    fn ready_state(&self) -> ReadyState {
        lock(&self.shared)
            .channels
            .get(&self.id)
            .map_or(ReadyState::Closed, |rec| rec.ready)
    }

    fn send_text(&self, text: String) -> Result<(), TransportError> {
        let mut shared = lock(&self.shared);
        let rec = shared
            .channels
            .get_mut(&self.id)
            .ok_or(TransportError::Stopped)?;
        if rec.ready != ReadyState::Open {
            return Err(TransportError::NotOpen);
        }
        rec.sent.push(text);
        Ok(())
    }

    fn close(&self) {
        if let Some(rec) = lock(&self.shared).channels.get_mut(&self.id) {
            rec.finish(self.id);
        }
    }
}

/// The remote side of every channel a [`MockConnector`] opened.
#[derive(Clone)]
pub struct MockTransport {
    shared: Arc<Mutex<Shared>>,
}

impl MockTransport {
    /// Number of channels opened so far.
    pub fn open_count(&self) -> usize {
        lock(&self.shared).opens
    }

    /// Completes the handshake of channel `id`.
    pub fn accept(&self, id: ChannelId) {
        if let Some(rec) = lock(&self.shared).channels.get_mut(&id) {
            if rec.closed {
                return;
            }
            rec.ready = ReadyState::Open;
            rec.emit(ChannelEvent::signal(id, ChannelSignal::Opened));
        }
    }

    /// Closes channel `id` from the remote side.
    pub fn close_from_remote(&self, id: ChannelId) {
        if let Some(rec) = lock(&self.shared).channels.get_mut(&id) {
            rec.finish(id);
        }
    }

    /// Fails channel `id`: reports an error, then the close that follows it.
    pub fn fail(&self, id: ChannelId) {
        if let Some(rec) = lock(&self.shared).channels.get_mut(&id) {
            if rec.closed {
                return;
            }
            rec.emit(ChannelEvent::signal(id, ChannelSignal::Failed));
            rec.finish(id);
        }
    }

    /// Delivers an inbound text frame on channel `id`.
    pub fn receive(&self, id: ChannelId, text: &str) {
        if let Some(rec) = lock(&self.shared).channels.get(&id) {
            rec.emit(ChannelEvent::message(id, text));
        }
    }

    /// Overrides what channel `id` reports as its ready state, without
    /// emitting any event.
    pub fn set_ready_state(&self, id: ChannelId, state: ReadyState) {
        if let Some(rec) = lock(&self.shared).channels.get_mut(&id) {
            rec.ready = state;
        }
    }

    /// Frames transmitted on channel `id`, in order.
    pub fn sent(&self, id: ChannelId) -> Vec<String> {
        lock(&self.shared)
            .channels
            .get(&id)
            .map(|rec| rec.sent.clone())
            .unwrap_or_default()
    }

    /// Returns `true` once channel `id` has closed, from either side.
    pub fn is_closed(&self, id: ChannelId) -> bool {
        lock(&self.shared)
            .channels
            .get(&id)
            .is_some_and(|rec| rec.closed)
    }
}
