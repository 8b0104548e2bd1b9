//! Infrastructure layer for the controller.
//!
//! Contains the adapters behind the application ports: the WebSocket
//! transport, preference files, and the event source.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain`, and
//! `remote_pad_core`, but MUST NOT be imported by the `application` or domain
//! layers (tests excepted).
//!
//! # Sub-modules
//!
//! - **`ws_transport`** – `WsConnector`, the production `Connector`.  Each
//!   channel is a tokio-tungstenite client driven by its own task.
//!
//! - **`preferences`** – `TomlPreferenceStore` (platform config directory)
//!   and `MemoryPreferenceStore`.
//!
//! - **`event_source`** – Reads raw surface events as JSON lines.
//!
//! - **`mock`** – In-memory `Connector` for tests.

pub mod event_source;
pub mod mock;
pub mod preferences;
pub mod ws_transport;
