//! SurfaceController: turns capture-surface events into outbound commands.
//!
//! This is the client's main use case.  It owns the delta tracker, the move
//! throttle, the persisted sensitivity, and the connection manager, and wires
//! them together:
//!
//! ```text
//! Press(pos)   -> begin tracking
//! Move(pos)    -> throttle gate -> tracker.move_to -> MOVE:<dx>;<dy>
//! Release      -> end tracking
//! Click        -> CLICK, unless it ends a drag
//! Key(k)       -> KEY:<k>          (not throttled)
//! Media(m)     -> MEDIA:<m>
//! Sensitivity* -> adjust + persist
//! Reconnect    -> ConnectionManager::reconnect
//! ```
//!
//! # Click suppression
//!
//! A surface fires a synthetic click after every press/release pair, drags
//! included.  A click is only transmitted when the gesture that produced it
//! never moved the remote pointer; a click that arrives while tracking is
//! still active ends tracking instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use remote_pad_core::{
    move_command, ClientCommand, ConnectionStatus, DeltaTracker, MediaCommand, Position,
    Sensitivity, ThrottleGate,
};

use crate::application::connection_manager::{ChannelEvent, ConnectionManager};
use crate::application::preferences::SensitivitySetting;
use crate::domain::{RawSurfaceEvent, SurfaceEvent};

/// How often the run loop checks the shutdown flag.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// The surface controller.
pub struct SurfaceController {
    manager: ConnectionManager,
    tracker: DeltaTracker,
    move_gate: ThrottleGate,
    sensitivity: SensitivitySetting,
    /// Set once the current gesture has transmitted a MOVE frame.
    gesture_moved: bool,
}

impl SurfaceController {
    /// Creates a controller.  Call [`SurfaceController::mount`] (or
    /// [`SurfaceController::run`], which mounts) to open the connection.
    pub fn new(
        manager: ConnectionManager,
        sensitivity: SensitivitySetting,
        move_interval: Duration,
    ) -> Self {
        Self {
            manager,
            tracker: DeltaTracker::new(),
            move_gate: ThrottleGate::new(move_interval),
            sensitivity,
            gesture_moved: false,
        }
    }

    /// Opens the connection.
    pub fn mount(&mut self) {
        info!("mounting capture surface at sensitivity {:.1}", self.sensitivity.value());
        self.manager.connect();
    }

    /// Closes the connection for good.
    pub fn teardown(&mut self) {
        self.tracker.end_tracking();
        self.manager.teardown();
    }

    /// Returns the current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.manager.status()
    }

    /// Returns a receiver that observes every status change.
    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.manager.subscribe()
    }

    /// Returns the current sensitivity.
    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity.current()
    }

    /// Returns `true` while a press is being tracked.
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_active()
    }

    /// Returns the connection manager this controller drives.
    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    /// Normalizes and handles a raw device event.  Malformed events are ignored.
    pub fn handle_raw(&mut self, raw: RawSurfaceEvent) {
        match raw.normalize() {
            Some(event) => self.handle(event),
            None => debug!("ignoring surface event without usable payload"),
        }
    }

    /// Handles one event using the current time for throttling.
    pub fn handle(&mut self, event: SurfaceEvent) {
        self.handle_at(event, Instant::now());
    }

    /// Handles one event as if it occurred at `now`.
    pub fn handle_at(&mut self, event: SurfaceEvent, now: Instant) {
        match event {
            SurfaceEvent::Press(pos) => {
                self.tracker.begin_tracking(pos);
                self.gesture_moved = false;
            }
            SurfaceEvent::Move(pos) => self.on_move(pos, now),
            SurfaceEvent::Release => self.tracker.end_tracking(),
            SurfaceEvent::Click => self.on_click(),
            SurfaceEvent::Key(key) => {
                self.manager.send_command(&ClientCommand::Key(key));
            }
            SurfaceEvent::Media(cmd) => self.send_media(cmd),
            SurfaceEvent::SensitivityUp => {
                let next = self.sensitivity.increment();
                info!("sensitivity raised to {:.1}", next.value());
            }
            SurfaceEvent::SensitivityDown => {
                let next = self.sensitivity.decrement();
                info!("sensitivity lowered to {:.1}", next.value());
            }
            SurfaceEvent::Reconnect => {
                self.manager.reconnect();
            }
        }
    }

    /// Applies an event reported by the transport channel.
    pub fn handle_channel_event(&mut self, event: ChannelEvent) {
        self.manager.handle_event(event);
    }

    fn on_move(&mut self, pos: Position, now: Instant) {
        if !self.move_gate.admit(now) {
            return;
        }
        let Some(motion) = self.tracker.move_to(pos, self.sensitivity.value()) else {
            return;
        };
        let cmd = move_command(motion);
        if cmd == (ClientCommand::Move { dx: 0, dy: 0 }) {
            return;
        }
        self.gesture_moved = true;
        self.manager.send_command(&cmd);
    }

    fn on_click(&mut self) {
        if self.tracker.is_active() {
            self.tracker.end_tracking();
        } else if self.gesture_moved {
            debug!("click suppressed after drag");
        } else {
            self.manager.send_command(&ClientCommand::Click);
        }
        self.gesture_moved = false;
    }

    fn send_media(&mut self, cmd: MediaCommand) {
        self.manager.send_command(&ClientCommand::Media(cmd));
    }

    /// Mounts, then processes surface and channel events until `input` closes
    /// or `running` is cleared.  Tears the connection down before returning.
    pub async fn run(
        mut self,
        mut input: mpsc::Receiver<RawSurfaceEvent>,
        mut channel_events: mpsc::UnboundedReceiver<ChannelEvent>,
        running: Arc<AtomicBool>,
    ) {
        self.mount();
        let mut shutdown_poll = tokio::time::interval(SHUTDOWN_POLL_INTERVAL);

        loop {
            tokio::select! {
                raw = input.recv() => match raw {
                    Some(raw) => self.handle_raw(raw),
                    None => {
                        info!("input source closed");
                        break;
                    }
                },
                Some(event) = channel_events.recv() => self.handle_channel_event(event),
                _ = shutdown_poll.tick() => {
                    if !running.load(Ordering::SeqCst) {
                        info!("shutdown requested");
                        break;
                    }
                }
            }
        }

        self.teardown();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
