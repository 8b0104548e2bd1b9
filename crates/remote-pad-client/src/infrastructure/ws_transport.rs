//! WebSocket transport channel.
//!
//! [`WsConnector`] opens one WebSocket per [`Connector::open`] call.  Each
//! channel is driven by its own Tokio task:
//!
//! ```text
//! WsChannel::send_text ──▶ outbound mpsc ──▶ ┐
//!                                            │  drive()  ◀──▶  remote host
//! ChannelEvent (Opened/Message/Failed/Closed) ◀┘
//! ```
//!
//! The task owns the socket; the [`WsChannel`] handle only holds the sender
//! half of the outbound queue and a shared ready-state cell, so neither
//! `send_text` nor `close` ever blocks the caller.
//!
//! # Event order
//!
//! A channel reports `Opened` at most once, then any number of `Message`s,
//! then optionally `Failed`, and finally exactly one `Closed`.  A failed
//! handshake reports `Failed` followed by `Closed`, and so does a handshake
//! that has not finished within the connector's handshake timeout.
//!
//! # TLS
//!
//! `wss://` endpoints need tokio-tungstenite built with one of its TLS
//! features.  Without one, connecting to a secure endpoint fails and the
//! channel reports `Failed`.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, info, warn};

use remote_pad_core::ChannelSignal;

use crate::application::connection_manager::{
    Channel, ChannelEvent, ChannelEventSender, ChannelId, Connector, ReadyState, TransportError,
};
use crate::domain::Endpoint;

const CONNECTING: u8 = 0;
const OPEN: u8 = 1;
const CLOSING: u8 = 2;
const CLOSED: u8 = 3;

/// Default limit for the TCP connect plus WebSocket upgrade.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

fn decode_state(raw: u8) -> ReadyState {
    match raw {
        CONNECTING => ReadyState::Connecting,
        OPEN => ReadyState::Open,
        CLOSING => ReadyState::Closing,
        _ => ReadyState::Closed,
    }
}

enum Outbound {
    Text(String),
    Close,
}

/// Opens WebSocket channels to a fixed endpoint.
///
/// [`Connector::open`] spawns onto the current Tokio runtime and must be
/// called from within one.
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
    handshake_timeout: Duration,
}

impl WsConnector {
    pub fn new(endpoint: &Endpoint) -> Self {
        Self {
            url: endpoint.url(),
            handshake_timeout: HANDSHAKE_TIMEOUT,
        }
    }

    /// Overrides how long a channel may stay in `Connecting`.
    pub fn with_handshake_timeout(mut self, limit: Duration) -> Self {
        self.handshake_timeout = limit;
        self
    }

    /// The URL every channel connects to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Connector for WsConnector {
    fn open(&self, id: ChannelId, events: ChannelEventSender) -> Box<dyn Channel> {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let ready = Arc::new(AtomicU8::new(CONNECTING));

        info!("channel {id}: connecting to {}", self.url);
        tokio::spawn(drive(
            self.url.clone(),
            self.handshake_timeout,
            id,
            events,
            outbound_rx,
            Arc::clone(&ready),
        ));

        Box::new(WsChannel {
            outbound: outbound_tx,
            ready,
        })
    }
}

/// Handle to one WebSocket channel.
pub struct WsChannel {
    outbound: mpsc::UnboundedSender<Outbound>,
    ready: Arc<AtomicU8>,
}

impl Channel for WsChannel {
    fn ready_state(&self) -> ReadyState {
        decode_state(self.ready.load(Ordering::SeqCst))
    }

    fn send_text(&self, text: String) -> Result<(), TransportError> {
        if self.ready_state() != ReadyState::Open {
            return Err(TransportError::NotOpen);
        }
        self.outbound
            .send(Outbound::Text(text))
            .map_err(|_| TransportError::Stopped)
    }

    fn close(&self) {
        let prev = self.ready.fetch_max(CLOSING, Ordering::SeqCst);
        if prev >= CLOSING {
            return;
        }
        // The task may already have exited; then the socket is gone anyway.
        let _ = self.outbound.send(Outbound::Close);
    }
}

fn emit(events: &ChannelEventSender, event: ChannelEvent) {
    // Nobody listening means the manager was dropped; nothing left to inform.
    let _ = events.send(event);
}

/// Owns the socket of channel `id` for its whole life.
async fn drive(
    url: String,
    handshake_timeout: Duration,
    id: ChannelId,
    events: ChannelEventSender,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    ready: Arc<AtomicU8>,
) {
    let handshake = match timeout(handshake_timeout, connect_async(url.as_str())).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err(format!("no handshake within {handshake_timeout:?}")),
    };
    let ws_stream = match handshake {
        Ok((ws_stream, _response)) => ws_stream,
        Err(reason) => {
            warn!("channel {id}: connecting to {url} failed: {reason}");
            ready.store(CLOSED, Ordering::SeqCst);
            emit(&events, ChannelEvent::signal(id, ChannelSignal::Failed));
            emit(&events, ChannelEvent::signal(id, ChannelSignal::Closed));
            return;
        }
    };

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // close() may have run while the handshake was in flight.
    if ready
        .compare_exchange(CONNECTING, OPEN, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        debug!("channel {id}: closed during handshake");
        let _ = ws_tx.send(WsMessage::Close(None)).await;
        ready.store(CLOSED, Ordering::SeqCst);
        emit(&events, ChannelEvent::signal(id, ChannelSignal::Closed));
        return;
    }

    info!("channel {id}: connected to {url}");
    emit(&events, ChannelEvent::signal(id, ChannelSignal::Opened));

    let failed = loop {
        tokio::select! {
            out = outbound.recv() => match out {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = ws_tx.send(WsMessage::Text(text)).await {
                        warn!("channel {id}: send failed: {e}");
                        break true;
                    }
                }
                Some(Outbound::Close) | None => {
                    ready.store(CLOSING, Ordering::SeqCst);
                    debug!("channel {id}: closing");
                    let _ = ws_tx.send(WsMessage::Close(None)).await;
                    break false;
                }
            },
            frame = ws_rx.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    emit(&events, ChannelEvent::message(id, text));
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    debug!("channel {id}: closed by remote host");
                    break false;
                }
                // Binary frames are not part of the protocol; ping/pong is
                // answered by tungstenite itself.
                Some(Ok(_)) => {}
                Some(Err(WsError::ConnectionClosed)) => break false,
                Some(Err(e)) => {
                    warn!("channel {id}: receive failed: {e}");
                    break true;
                }
            }
        }
    };

    let _ = ws_tx.close().await;
    ready.store(CLOSED, Ordering::SeqCst);
    if failed {
        emit(&events, ChannelEvent::signal(id, ChannelSignal::Failed));
    }
    emit(&events, ChannelEvent::signal(id, ChannelSignal::Closed));
    info!("channel {id}: closed");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
