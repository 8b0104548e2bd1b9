//! Client configuration types.
//!
//! [`ClientConfig`] is the single source of truth for runtime settings.  It is
//! built from CLI arguments in `main.rs` or from [`Default`] in tests; the
//! domain never reads the environment itself.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use remote_pad_core::domain::throttle::DEFAULT_MOVE_INTERVAL;

/// The WebSocket endpoint of the remote host.
///
/// The URL is derived from the host the controller was served from, e.g.
/// `ws://192.168.1.20:8080/ws`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// `host[:port]` of the remote host.
    pub host: String,
    /// Use `wss://` instead of `ws://`.
    pub secure: bool,
    /// Request path of the WebSocket route.
    pub path: String,
}

impl Endpoint {
    /// Creates a plain `ws://` endpoint on the default `/ws` path.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            secure: false,
            path: "/ws".to_string(),
        }
    }

    /// Returns the full WebSocket URL.
    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        let path = self.path.trim_start_matches('/');
        format!("{scheme}://{}/{path}", self.host)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new("127.0.0.1:8080")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// All runtime configuration for the controller.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Where to open the transport channel.
    pub endpoint: Endpoint,

    /// Minimum spacing between two transmitted move events.
    ///
    /// 20 ms bounds motion traffic to 50 frames per second while keeping the
    /// first movement of a burst immediate.
    pub move_interval: Duration,

    /// Preference file holding the sensitivity.  `None` keeps preferences in
    /// memory for the lifetime of the process.
    pub preferences_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    /// | Field            | Default                  |
    /// |------------------|--------------------------|
    /// | endpoint         | `ws://127.0.0.1:8080/ws` |
    /// | move_interval    | 20 ms                    |
    /// | preferences_path | none (in memory)         |
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            move_interval: DEFAULT_MOVE_INTERVAL,
            preferences_path: None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_url() {
        assert_eq!(Endpoint::default().url(), "ws://127.0.0.1:8080/ws");
    }

    #[test]
    fn test_secure_endpoint_uses_wss() {
        let ep = Endpoint {
            secure: true,
            ..Endpoint::new("pad.local")
        };
        assert_eq!(ep.url(), "wss://pad.local/ws");
    }

    #[test]
    fn test_path_without_leading_slash_is_normalized() {
        let ep = Endpoint {
            path: "control/ws".to_string(),
            ..Endpoint::new("10.0.0.5:9000")
        };
        assert_eq!(ep.url(), "ws://10.0.0.5:9000/control/ws");
    }

    #[test]
    fn test_display_matches_url() {
        let ep = Endpoint::new("host:1");
        assert_eq!(ep.to_string(), ep.url());
    }

    #[test]
    fn test_default_move_interval_is_20ms() {
        assert_eq!(ClientConfig::default().move_interval, Duration::from_millis(20));
    }

    #[test]
    fn test_default_preferences_are_in_memory() {
        assert!(ClientConfig::default().preferences_path.is_none());
    }
}
