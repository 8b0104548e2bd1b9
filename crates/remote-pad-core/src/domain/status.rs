//! Connection status of the transport channel.
//!
//! # State machine
//!
//! ```text
//!              Opened              Closed
//! Connecting ─────────▶ Connected ─────────▶ Disconnected
//!     │  │                  │
//!     │  └──── Closed ──────┼──────────────▶ Disconnected
//!     │                     │ Failed
//!     └──── Failed ─────────┴──────────────▶ Error
//! ```
//!
//! `Connecting` is only entered through an explicit connect or reconnect; the
//! transition table below never produces it from a channel signal.  `Error` is
//! sticky: a transport reports a failure and then a close, and the user should
//! keep seeing the failure until they reconnect.

use std::fmt;

/// Link health as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    /// A channel is being opened.  Reconnect requests are ignored.
    Connecting,
    /// The channel is open and frames are being transmitted.
    Connected,
    /// The channel closed.
    Disconnected,
    /// The channel reported a failure.
    Error,
}

/// Lifecycle signal reported by a transport channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSignal {
    /// The channel finished its handshake and is ready to send.
    Opened,
    /// The channel closed (by either side).
    Closed,
    /// The channel hit an error.
    Failed,
}

impl ConnectionStatus {
    /// Returns the status that follows `signal` in this state.
    pub fn on_signal(self, signal: ChannelSignal) -> Self {
        use ChannelSignal::*;
        use ConnectionStatus::*;

        match (self, signal) {
            (Connecting, Opened) => Connected,
            (Connecting | Connected, Closed) => Disconnected,
            (Connecting | Connected, Failed) => Error,
            (state, _) => state,
        }
    }

    /// Returns `true` when a manual reconnect should be offered to the user.
    ///
    /// The reconnect control is hidden while connecting (a second attempt would
    /// overlap) and while connected (nothing to recover from).
    pub fn can_reconnect(self) -> bool {
        matches!(self, ConnectionStatus::Disconnected | ConnectionStatus::Error)
    }

    /// Short label for the status indicator; `None` while connected.
    pub fn label(self) -> Option<&'static str> {
        match self {
            ConnectionStatus::Connecting => Some("Connecting"),
            ConnectionStatus::Connected => None,
            ConnectionStatus::Disconnected => Some("Disconnected"),
            ConnectionStatus::Error => Some("Error"),
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
