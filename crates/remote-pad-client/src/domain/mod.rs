//! Domain layer for remote-pad-client.
//!
//! # What belongs in the domain layer?
//!
//! - Configuration structures
//! - The raw, device-shaped input events and their normalization into
//!   [`SurfaceEvent`]
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, socket, or file types
//! - Anything that could block or fail due to external state

pub mod config;
pub mod events;

pub use config::{ClientConfig, Endpoint};
pub use events::{RawSurfaceEvent, SurfaceEvent, TouchPoint};
