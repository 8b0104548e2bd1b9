//! Application layer: the use cases that drive the controller.
//!
//! - [`connection_manager`]: owns the transport channel and its status.
//! - [`preferences`]: the preference storage port and persisted sensitivity.
//! - [`surface`]: turns capture-surface events into outbound commands.

pub mod connection_manager;
pub mod preferences;
pub mod surface;

pub use connection_manager::{
    Channel, ChannelEvent, ChannelEventKind, ChannelEventSender, ChannelId, ConnectionManager,
    Connector, ReadyState, TransportError,
};
pub use preferences::{PreferenceError, PreferenceStore, SensitivitySetting, SENSITIVITY_KEY};
pub use surface::SurfaceController;
