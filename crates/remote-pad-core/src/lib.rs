//! # remote-pad-core
//!
//! Shared library for remote-pad containing the motion-tracking state machine,
//! the move-event throttle, the connection status model, and the text wire
//! protocol spoken between the controller and the remote host.
//!
//! This crate has zero dependencies on async runtimes, sockets, or the file
//! system.  Everything here is a plain value or a synchronous state machine, so
//! it can be unit-tested without a network.
//!
//! # Architecture overview (for beginners)
//!
//! remote-pad turns a phone or laptop into a touchpad for another computer.
//! The user drags a finger (or the mouse) across a *capture surface*; the
//! client converts those absolute positions into small relative movements and
//! sends them to the remote host as short text frames such as `MOVE:5;2`.
//!
//! - **`domain`** – Pure input logic: positions, the delta tracker that turns
//!   absolute samples into scaled relative motion, the sensitivity factor, the
//!   rate-limiting throttle, and the connection status state machine.
//!
//! - **`protocol`** – How commands travel over the wire.  Each command is one
//!   single-line text frame (`MOVE:<dx>;<dy>`, `CLICK`, `MEDIA:<cmd>`,
//!   `KEY:<key>`).  The codec encodes commands for the client and parses them
//!   for a host.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `remote_pad_core::DeltaTracker` instead of the full module path.
pub use domain::status::{ChannelSignal, ConnectionStatus};
pub use domain::throttle::{ThrottleGate, Throttled};
pub use domain::tracking::{DeltaTracker, MotionEvent, Position, TrackingState};
pub use domain::sensitivity::Sensitivity;
pub use protocol::codec::{encode_command, encode_move, move_command, ProtocolError};
pub use protocol::messages::{ClientCommand, MediaCommand, ServerFrame};
