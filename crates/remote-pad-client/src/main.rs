//! remote-pad: entry point.
//!
//! Reads raw capture-surface events as JSON lines on stdin, turns them into
//! remote-pad wire frames, and sends them to the remote host over WebSocket.
//!
//! # Usage
//!
//! ```text
//! remote-pad [OPTIONS]
//!
//! Options:
//!   --host <HOST[:PORT]>   Remote host [default: 127.0.0.1:8080]
//!   --secure               Use wss:// instead of ws://
//!   --path <PATH>          WebSocket route [default: /ws]
//!   --throttle-ms <MS>     Minimum spacing of move frames [default: 20]
//!   --prefs <FILE>         Preference file [default: platform config dir]
//!   --no-persist           Keep preferences in memory only
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                 | Default          | Description                  |
//! |--------------------------|------------------|------------------------------|
//! | `REMOTE_PAD_HOST`        | `127.0.0.1:8080` | Remote host                  |
//! | `REMOTE_PAD_SECURE`      | `false`          | Use `wss://`                 |
//! | `REMOTE_PAD_PATH`        | `/ws`            | WebSocket route              |
//! | `REMOTE_PAD_THROTTLE_MS` | `20`             | Move frame spacing (ms)      |
//! | `REMOTE_PAD_PREFS`       | platform default | Preference file              |
//!
//! # Example
//!
//! ```text
//! $ printf '%s\n' '{"type":"mousedown","offset_x":10,"offset_y":10}' \
//!                 '{"type":"mousemove","offset_x":15,"offset_y":12}' \
//!                 '{"type":"mouseup"}' | remote-pad --host 192.168.1.20:8080
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use remote_pad_client::application::{
    ConnectionManager, PreferenceStore, SensitivitySetting, SurfaceController,
};
use remote_pad_client::domain::{ClientConfig, Endpoint};
use remote_pad_client::infrastructure::event_source::read_events;
use remote_pad_client::infrastructure::preferences::{
    default_preferences_path, MemoryPreferenceStore, TomlPreferenceStore,
};
use remote_pad_client::infrastructure::ws_transport::WsConnector;

/// Capacity of the queue between the event source and the controller.
const INPUT_QUEUE: usize = 256;

/// How long shutdown waits for background tasks.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// remote-pad controller.
///
/// Relays pointer, key and media input to a remote host over one WebSocket.
#[derive(Debug, Parser)]
#[command(
    name = "remote-pad",
    about = "Touchpad-style remote input controller",
    version
)]
struct Cli {
    /// Remote host as `host[:port]`, without scheme or path.
    #[arg(long, default_value = "127.0.0.1:8080", env = "REMOTE_PAD_HOST")]
    host: String,

    /// Connect with `wss://` instead of `ws://`.
    #[arg(long, env = "REMOTE_PAD_SECURE")]
    secure: bool,

    /// Request path of the host's WebSocket route.
    #[arg(long, default_value = "/ws", env = "REMOTE_PAD_PATH")]
    path: String,

    /// Minimum spacing between two move frames, in milliseconds.
    #[arg(long, default_value_t = 20, env = "REMOTE_PAD_THROTTLE_MS")]
    throttle_ms: u64,

    /// Preference file.  Defaults to `preferences.toml` in the platform
    /// config directory.
    #[arg(long, env = "REMOTE_PAD_PREFS", conflicts_with = "no_persist")]
    prefs: Option<PathBuf>,

    /// Keep preferences in memory only.
    #[arg(long)]
    no_persist: bool,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--host` is empty or carries a scheme or path.
    fn into_client_config(self) -> anyhow::Result<ClientConfig> {
        let host = self.host.trim();
        if host.is_empty() {
            bail!("--host must not be empty");
        }
        if host.contains("://") || host.contains('/') {
            bail!("--host expects host[:port] without scheme or path, got '{host}'");
        }

        let preferences_path = if self.no_persist {
            None
        } else {
            self.prefs.or_else(default_preferences_path)
        };

        Ok(ClientConfig {
            endpoint: Endpoint {
                host: host.to_string(),
                secure: self.secure,
                path: self.path,
            },
            move_interval: Duration::from_millis(self.throttle_ms),
            preferences_path,
        })
    }
}

/// Opens the preference store named by `config`, falling back to memory when
/// the file cannot be read.
fn open_preferences(config: &ClientConfig) -> Box<dyn PreferenceStore> {
    let Some(path) = config.preferences_path.as_ref() else {
        info!("preferences kept in memory");
        return Box::new(MemoryPreferenceStore::new());
    };
    match TomlPreferenceStore::open(path) {
        Ok(store) => {
            info!("preferences at {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            warn!("{e}; preferences kept in memory");
            Box::new(MemoryPreferenceStore::new())
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse()
        .into_client_config()
        .context("invalid command-line configuration")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(run(config));
    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    info!("remote-pad stopped");
    Ok(())
}

/// Wires the controller together and runs it until input ends or Ctrl+C.
async fn run(config: ClientConfig) {
    info!("remote-pad starting, endpoint={}", config.endpoint);

    let sensitivity = SensitivitySetting::load(open_preferences(&config));
    let connector = WsConnector::new(&config.endpoint);
    let (manager, channel_events) = ConnectionManager::new(Box::new(connector));

    // Status strip: a label while not connected, plus the reconnect hint.
    let mut status_rx = manager.subscribe();
    tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let status = *status_rx.borrow_and_update();
            match status.label() {
                Some(label) if status.can_reconnect() => {
                    warn!("{label}; send {{\"type\":\"reconnect\"}} to retry");
                }
                Some(label) => info!("{label}"),
                None => info!("connected"),
            }
        }
    });

    let controller = SurfaceController::new(manager, sensitivity, config.move_interval);

    let (input_tx, input_rx) = mpsc::channel(INPUT_QUEUE);
    tokio::spawn(async move {
        read_events(BufReader::new(tokio::io::stdin()), input_tx).await;
    });

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::SeqCst);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    controller.run(input_rx, channel_events, running).await;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
