//! ConnectionManager: owns the transport channel and tracks link health.
//!
//! # Lifecycle
//!
//! ```text
//! connect()    -> Connecting -- Opened --> Connected -- Closed --> Disconnected
//!                     │                       │
//!                     └──── Failed ───────────┴─────────────────▶ Error
//! reconnect()  -> ignored while Connecting, otherwise close + connect()
//! teardown()   -> closes the channel; later channel events are ignored
//! ```
//!
//! The manager never holds two channels.  Every channel it opens gets a fresh
//! [`ChannelId`]; events are tagged with it, and events from a channel that is
//! no longer the live one are discarded.  A late `Closed` from the channel a
//! reconnect just replaced therefore cannot knock the new one offline.
//!
//! # Send policy
//!
//! [`ConnectionManager::send`] is best-effort and at-most-once.  A frame is
//! handed to the channel only while the status is `Connected` *and* the
//! channel reports itself open; otherwise it is dropped without an error.
//! Motion data goes stale within milliseconds, so buffering it for later would
//! only replay outdated movement.

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use remote_pad_core::{encode_command, ChannelSignal, ClientCommand, ConnectionStatus, ServerFrame};

/// Identifies one channel instance opened by a [`ConnectionManager`].
pub type ChannelId = u64;

/// Errors a channel reports when handed a frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The channel is connecting, closing, or closed.
    #[error("channel is not open")]
    NotOpen,
    /// The I/O task behind the channel has stopped.
    #[error("channel task has stopped")]
    Stopped,
}

/// The ready condition a channel reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// What happened on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEventKind {
    /// Lifecycle change (open, close, error).
    Signal(ChannelSignal),
    /// A text frame arrived from the remote host.
    Message(String),
}

/// An event reported by the channel identified by `channel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEvent {
    pub channel: ChannelId,
    pub kind: ChannelEventKind,
}

impl ChannelEvent {
    /// Shorthand for a lifecycle event.
    pub fn signal(channel: ChannelId, signal: ChannelSignal) -> Self {
        Self {
            channel,
            kind: ChannelEventKind::Signal(signal),
        }
    }

    /// Shorthand for an inbound text frame.
    pub fn message(channel: ChannelId, text: impl Into<String>) -> Self {
        Self {
            channel,
            kind: ChannelEventKind::Message(text.into()),
        }
    }
}

/// Sender half a channel uses to report its events back to the manager.
pub type ChannelEventSender = mpsc::UnboundedSender<ChannelEvent>;

/// One live transport channel.
///
/// Implementations must never block: `send_text` and `close` only enqueue work.
pub trait Channel: Send {
    /// Returns the channel's own view of its readiness.
    fn ready_state(&self) -> ReadyState;

    /// Enqueues one text frame for transmission.
    fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Starts closing the channel.  Calling this on a closed channel is a no-op.
    fn close(&self);
}

/// Opens channels to a fixed endpoint.
///
/// The production implementation opens a WebSocket; tests use
/// [`crate::infrastructure::mock::MockConnector`].
pub trait Connector: Send {
    /// Opens a channel tagged `id` that reports its events on `events`.
    fn open(&self, id: ChannelId, events: ChannelEventSender) -> Box<dyn Channel>;
}

/// Callback invoked for every inbound frame on the live channel.
pub type MessageHook = Box<dyn FnMut(&ServerFrame) + Send>;

/// The connection manager.
pub struct ConnectionManager {
    connector: Box<dyn Connector>,
    channel: Option<(ChannelId, Box<dyn Channel>)>,
    next_id: ChannelId,
    status: watch::Sender<ConnectionStatus>,
    events_tx: ChannelEventSender,
    message_hook: Option<MessageHook>,
    torn_down: bool,
}

impl ConnectionManager {
    /// Creates a manager in the `Connecting` state and returns it together
    /// with the receiver its channels report events on.
    ///
    /// No channel is opened until [`ConnectionManager::connect`] is called.
    pub fn new(connector: Box<dyn Connector>) -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (status, _) = watch::channel(ConnectionStatus::Connecting);
        let mgr = Self {
            connector,
            channel: None,
            next_id: 0,
            status,
            events_tx,
            message_hook: None,
            torn_down: false,
        };
        (mgr, events_rx)
    }

    /// Returns the current status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Returns a receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Returns the id of the live channel, if any.
    pub fn live_channel(&self) -> Option<ChannelId> {
        self.channel.as_ref().map(|(id, _)| *id)
    }

    /// Returns `true` once [`ConnectionManager::teardown`] has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Registers the callback that observes inbound frames.
    pub fn set_message_hook(&mut self, hook: MessageHook) {
        self.message_hook = Some(hook);
    }

    /// Opens a new channel and enters `Connecting`.
    ///
    /// Any existing channel is closed first so that only one is ever live.
    pub fn connect(&mut self) {
        if self.torn_down {
            warn!("connect requested after teardown; ignoring");
            return;
        }
        self.close_live_channel();

        let id = self.next_id;
        self.next_id += 1;
        self.set_status(ConnectionStatus::Connecting);
        let channel = self.connector.open(id, self.events_tx.clone());
        self.channel = Some((id, channel));
        debug!("opened channel {id}");
    }

    /// Manually re-establishes the channel.
    ///
    /// Ignored while `Connecting`, so repeated presses of the reconnect
    /// control never stack connection attempts.  Returns `true` when a new
    /// connection attempt was started.
    pub fn reconnect(&mut self) -> bool {
        if self.status() == ConnectionStatus::Connecting {
            debug!("reconnect ignored: a connection attempt is already in progress");
            return false;
        }
        if self.torn_down {
            return false;
        }
        info!("reconnecting (was {})", self.status());
        self.connect();
        true
    }

    /// Transmits `message` if the link is up; drops it silently otherwise.
    ///
    /// Returns `true` when the frame was handed to the channel.
    pub fn send(&mut self, message: String) -> bool {
        if self.status() != ConnectionStatus::Connected {
            debug!("dropping frame while {}: {message}", self.status());
            return false;
        }
        let Some((id, channel)) = self.channel.as_ref() else {
            return false;
        };
        if channel.ready_state() != ReadyState::Open {
            debug!("dropping frame, channel {id} not open: {message}");
            return false;
        }
        match channel.send_text(message) {
            Ok(()) => true,
            Err(e) => {
                debug!("dropping frame on channel {id}: {e}");
                false
            }
        }
    }

    /// Encodes and sends a command.  See [`ConnectionManager::send`].
    pub fn send_command(&mut self, cmd: &ClientCommand) -> bool {
        self.send(encode_command(cmd))
    }

    /// Applies an event reported by a channel.
    ///
    /// Events from channels other than the live one, and every event after
    /// teardown, are ignored.
    pub fn handle_event(&mut self, event: ChannelEvent) {
        if self.torn_down || self.live_channel() != Some(event.channel) {
            debug!("ignoring event from stale channel {}: {:?}", event.channel, event.kind);
            return;
        }

        match event.kind {
            ChannelEventKind::Signal(signal) => {
                let next = self.status().on_signal(signal);
                if signal == ChannelSignal::Failed {
                    warn!("channel {} reported an error", event.channel);
                }
                self.set_status(next);
            }
            ChannelEventKind::Message(text) => {
                let frame = ServerFrame::parse(&text);
                debug!("received from host: {frame:?}");
                if let Some(hook) = self.message_hook.as_mut() {
                    hook(&frame);
                }
            }
        }
    }

    /// Closes the channel for good.  No status transition is observed afterward.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.close_live_channel();
        info!("connection torn down");
    }

    fn close_live_channel(&mut self) {
        if let Some((id, channel)) = self.channel.take() {
            debug!("closing channel {id}");
            channel.close();
        }
    }

    /// Publishes `next`.  Subscribers are only woken by actual changes.
    fn set_status(&mut self, next: ConnectionStatus) {
        let prev = self.status();
        if prev == next {
            return;
        }
        self.status.send_replace(next);
        info!("connection status: {prev} -> {next}");
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.torn_down = true;
        self.close_live_channel();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio_test::{assert_pending, assert_ready_ok};

    use super::*;
    use crate::infrastructure::mock::{MockConnector, MockTransport};

    fn make_manager() -> (
        ConnectionManager,
        mpsc::UnboundedReceiver<ChannelEvent>,
        MockTransport,
    ) {
        let (connector, transport) = MockConnector::new();
        let (mgr, rx) = ConnectionManager::new(Box::new(connector));
        (mgr, rx, transport)
    }

    /// Delivers every queued channel event to the manager.
    fn pump(mgr: &mut ConnectionManager, rx: &mut mpsc::UnboundedReceiver<ChannelEvent>) {
        while let Ok(ev) = rx.try_recv() {
            mgr.handle_event(ev);
        }
    }

    #[test]
    fn test_initial_status_is_connecting_without_channel() {
        let (mgr, _rx, transport) = make_manager();
        assert_eq!(mgr.status(), ConnectionStatus::Connecting);
        assert_eq!(mgr.live_channel(), None);
        assert_eq!(transport.open_count(), 0);
    }

    #[test]
    fn test_connect_then_open_becomes_connected() {
        // Arrange
        let (mut mgr, mut rx, transport) = make_manager();

        // Act
        mgr.connect();
        transport.accept(0);
        pump(&mut mgr, &mut rx);

        // Assert
        assert_eq!(mgr.status(), ConnectionStatus::Connected);
        assert_eq!(transport.open_count(), 1);
    }

    #[test]
    fn test_remote_close_becomes_disconnected() {
        let (mut mgr, mut rx, transport) = make_manager();
        mgr.connect();
        transport.accept(0);
        pump(&mut mgr, &mut rx);

        transport.close_from_remote(0);
        pump(&mut mgr, &mut rx);

        assert_eq!(mgr.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_channel_failure_becomes_error_and_stays_error_after_close() {
        let (mut mgr, mut rx, transport) = make_manager();
        mgr.connect();

        transport.fail(0);
        pump(&mut mgr, &mut rx);

        assert_eq!(mgr.status(), ConnectionStatus::Error);
    }

    #[test]
    fn test_reconnect_while_connecting_is_ignored() {
        // Arrange
        let (mut mgr, _rx, transport) = make_manager();
        mgr.connect();

        // Act
        let started = mgr.reconnect();

        // Assert: no second channel, state unchanged
        assert!(!started);
        assert_eq!(transport.open_count(), 1);
        assert_eq!(mgr.status(), ConnectionStatus::Connecting);
        assert_eq!(mgr.live_channel(), Some(0));
    }

    #[test]
    fn test_reconnect_after_disconnect_opens_new_channel() {
        // Arrange
        let (mut mgr, mut rx, transport) = make_manager();
        mgr.connect();
        transport.accept(0);
        pump(&mut mgr, &mut rx);
        transport.close_from_remote(0);
        pump(&mut mgr, &mut rx);

        // Act
        assert!(mgr.reconnect());

        // Assert
        assert_eq!(mgr.status(), ConnectionStatus::Connecting);
        assert_eq!(transport.open_count(), 2);
        assert_eq!(mgr.live_channel(), Some(1));

        transport.accept(1);
        pump(&mut mgr, &mut rx);
        assert_eq!(mgr.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_reconnect_from_error_recovers() {
        let (mut mgr, mut rx, transport) = make_manager();
        mgr.connect();
        transport.fail(0);
        pump(&mut mgr, &mut rx);

        assert!(mgr.reconnect());
        transport.accept(1);
        pump(&mut mgr, &mut rx);

        assert_eq!(mgr.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_reconnect_while_connected_closes_old_channel() {
        // Arrange
        let (mut mgr, mut rx, transport) = make_manager();
        mgr.connect();
        transport.accept(0);
        pump(&mut mgr, &mut rx);

        // Act
        assert!(mgr.reconnect());
        // The old channel's close event is queued now; it must be ignored.
        pump(&mut mgr, &mut rx);

        // Assert
        assert!(transport.is_closed(0));
        assert!(!transport.is_closed(1));
        assert_eq!(mgr.status(), ConnectionStatus::Connecting);
    }

    #[test]
    fn test_stale_channel_events_are_ignored() {
        let (mut mgr, mut rx, transport) = make_manager();
        mgr.connect();
        transport.fail(0);
        pump(&mut mgr, &mut rx);
        mgr.reconnect();
        transport.accept(1);
        pump(&mut mgr, &mut rx);

        // A late event from channel 0 arrives after channel 1 is up
        mgr.handle_event(ChannelEvent::signal(0, ChannelSignal::Closed));

        assert_eq!(mgr.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_send_while_connected_reaches_channel() {
        let (mut mgr, mut rx, transport) = make_manager();
        mgr.connect();
        transport.accept(0);
        pump(&mut mgr, &mut rx);

        assert!(mgr.send("CLICK".to_string()));
        assert!(mgr.send_command(&ClientCommand::Key("a".into())));

        assert_eq!(transport.sent(0), vec!["CLICK", "KEY:a"]);
    }

    #[test]
    fn test_send_while_connecting_is_dropped() {
        let (mut mgr, _rx, transport) = make_manager();
        mgr.connect();

        assert!(!mgr.send("CLICK".to_string()));
        assert!(transport.sent(0).is_empty());
    }

    #[test]
    fn test_send_before_any_connect_is_dropped() {
        let (mut mgr, _rx, _transport) = make_manager();
        assert!(!mgr.send("CLICK".to_string()));
    }

    #[test]
    fn test_send_is_dropped_when_channel_not_open_despite_connected_status() {
        // Arrange: the status still says connected, but the channel has
        // already noticed it is closing (its close event is not processed yet).
        let (mut mgr, mut rx, transport) = make_manager();
        mgr.connect();
        transport.accept(0);
        pump(&mut mgr, &mut rx);
        transport.set_ready_state(0, ReadyState::Closing);

        // Act / Assert
        assert!(!mgr.send("CLICK".to_string()));
        assert!(transport.sent(0).is_empty());
    }

    #[test]
    fn test_send_after_disconnect_is_dropped() {
        let (mut mgr, mut rx, transport) = make_manager();
        mgr.connect();
        transport.accept(0);
        pump(&mut mgr, &mut rx);
        transport.close_from_remote(0);
        pump(&mut mgr, &mut rx);

        assert!(!mgr.send("MOVE:1;1".to_string()));
    }

    #[test]
    fn test_teardown_closes_channel_and_freezes_status() {
        // Arrange
        let (mut mgr, mut rx, transport) = make_manager();
        mgr.connect();
        transport.accept(0);
        pump(&mut mgr, &mut rx);

        // Act
        mgr.teardown();
        transport.fail(0);
        pump(&mut mgr, &mut rx);

        // Assert
        assert!(transport.is_closed(0));
        assert!(mgr.is_torn_down());
        assert_eq!(mgr.status(), ConnectionStatus::Connected);
        assert!(!mgr.reconnect());
        assert_eq!(transport.open_count(), 1);
    }

    #[test]
    fn test_drop_closes_live_channel() {
        let (mut mgr, _rx, transport) = make_manager();
        mgr.connect();
        drop(mgr);
        assert!(transport.is_closed(0));
    }

    #[test]
    fn test_subscribers_observe_status_changes() {
        let (mut mgr, mut rx, transport) = make_manager();
        let status_rx = mgr.subscribe();
        mgr.connect();
        transport.accept(0);
        pump(&mut mgr, &mut rx);

        assert_eq!(*status_rx.borrow(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_subscriber_is_woken_only_by_real_changes() {
        // Arrange
        let (mut mgr, mut rx, transport) = make_manager();
        let mut status_rx = mgr.subscribe();
        let mut changed = tokio_test::task::spawn(status_rx.changed());

        // Act / Assert: connecting -> connecting is not a change
        mgr.connect();
        assert_pending!(changed.poll());

        transport.accept(0);
        pump(&mut mgr, &mut rx);
        assert!(changed.is_woken());
        assert_ready_ok!(changed.poll());
    }

    #[test]
    fn test_inbound_frames_reach_message_hook() {
        // Arrange
        let (mut mgr, mut rx, transport) = make_manager();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_hook = Arc::clone(&seen);
        mgr.set_message_hook(Box::new(move |frame| {
            seen_hook.lock().unwrap().push(frame.clone());
        }));
        mgr.connect();
        transport.accept(0);

        // Act
        transport.receive(0, "moved!");
        transport.receive(0, "BYE");
        pump(&mut mgr, &mut rx);

        // Assert
        assert_eq!(
            *seen.lock().unwrap(),
            vec![ServerFrame::Text("moved!".into()), ServerFrame::Bye]
        );
    }
}
