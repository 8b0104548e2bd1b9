//! remote-pad-client library crate.
//!
//! This crate turns pointer, touch, key and media-button input on a capture
//! surface into remote-pad wire frames and relays them to the remote host over
//! one WebSocket.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! raw surface events (JSON lines, DOM-shaped)
//!         ↓ normalize
//! [remote-pad-client]
//!   ├── domain/           ClientConfig, raw events → SurfaceEvent
//!   ├── application/      SurfaceController, ConnectionManager, sensitivity
//!   └── infrastructure/
//!         ├── ws_transport/  WebSocket channel (tokio-tungstenite)
//!         ├── preferences/   TOML key-value store
//!         ├── event_source/  stdin JSON-lines reader
//!         └── mock/          in-memory channel for tests
//!         ↓
//! remote host (MOVE / CLICK / MEDIA / KEY text frames)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain`, `remote-pad-core`, and the traits it
//!   declares (`Connector`, `Channel`, `PreferenceStore`).
//! - `infrastructure` implements those traits with `tokio`, `tungstenite` and
//!   the file system.

/// Domain layer: configuration and input-event normalization (no I/O).
pub mod domain;

/// Application layer: connection lifecycle and input routing.
pub mod application;

/// Infrastructure layer: WebSocket transport, preference file, input source.
pub mod infrastructure;
