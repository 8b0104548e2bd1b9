//! Text codec for the remote-pad wire protocol.
//!
//! Encoding is infallible: every [`ClientCommand`] has exactly one text form.
//! Parsing is what a host does with incoming frames; it reports unknown or
//! malformed frames as [`ProtocolError`] so the host can treat them as no-ops.
//!
//! # Motion rounding
//!
//! Motion deltas are fractional until they hit the wire.  Each component is
//! rounded with `f64::floor`, i.e. towards negative infinity:
//!
//! ```text
//! ( 3.7, -2.2)  ->  MOVE:3;-3
//! ( 0.4, -0.4)  ->  MOVE:0;-1
//! ```
//!
//! Values beyond the `i32` range saturate; NaN encodes as `0`.

use std::str::FromStr;

use thiserror::Error;

use crate::domain::tracking::MotionEvent;
use crate::protocol::messages::{ClientCommand, MediaCommand};

const MOVE_PREFIX: &str = "MOVE:";
const MEDIA_PREFIX: &str = "MEDIA:";
const KEY_PREFIX: &str = "KEY:";
const ECHO_PREFIX: &str = "ECHO:";
const CLICK: &str = "CLICK";
const CLOSE: &str = "CLOSE";

/// Errors produced when parsing a wire frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame does not start with any known command.
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    /// A `MEDIA:` frame named a command outside the media set.
    #[error("unknown media option: '{0}'")]
    UnknownMediaCommand(String),

    /// The command is known but its payload is unusable.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a motion delta as a `MOVE` frame, flooring each component.
///
/// # Examples
///
/// ```rust
/// use remote_pad_core::encode_move;
///
/// assert_eq!(encode_move(5.0, 2.0), "MOVE:5;2");
/// assert_eq!(encode_move(3.7, -2.2), "MOVE:3;-3");
/// ```
pub fn encode_move(dx: f64, dy: f64) -> String {
    encode_command(&move_command(MotionEvent { dx, dy }))
}

/// Converts a fractional motion event into the integer `Move` command sent on the wire.
pub fn move_command(motion: MotionEvent) -> ClientCommand {
    ClientCommand::Move {
        dx: floor_component(motion.dx),
        dy: floor_component(motion.dy),
    }
}

/// Encodes any client command as its single-line text frame.
pub fn encode_command(cmd: &ClientCommand) -> String {
    match cmd {
        ClientCommand::Move { dx, dy } => format!("{MOVE_PREFIX}{dx};{dy}"),
        ClientCommand::Click => CLICK.to_string(),
        ClientCommand::Media(media) => format!("{MEDIA_PREFIX}{}", media.as_str()),
        ClientCommand::Key(key) => format!("{KEY_PREFIX}{key}"),
        ClientCommand::Echo(text) => format!("{ECHO_PREFIX}{text}"),
        ClientCommand::Close => CLOSE.to_string(),
    }
}

impl FromStr for ClientCommand {
    type Err = ProtocolError;

    /// Parses a frame as a host would.
    ///
    /// `MOVE` components that are missing or not integers read as `0`, so a
    /// damaged motion frame degrades to a smaller movement instead of an error.
    fn from_str(frame: &str) -> Result<Self, Self::Err> {
        if frame == CLICK {
            return Ok(ClientCommand::Click);
        }
        if frame == CLOSE {
            return Ok(ClientCommand::Close);
        }
        if let Some(rest) = frame.strip_prefix(MOVE_PREFIX) {
            let mut parts = rest.split(';').map(|s| s.trim().parse::<i32>().unwrap_or(0));
            let dx = parts.next().unwrap_or(0);
            let dy = parts.next().unwrap_or(0);
            return Ok(ClientCommand::Move { dx, dy });
        }
        if let Some(rest) = frame.strip_prefix(MEDIA_PREFIX) {
            return rest.parse::<MediaCommand>().map(ClientCommand::Media);
        }
        if let Some(rest) = frame.strip_prefix(KEY_PREFIX) {
            if rest.is_empty() {
                return Err(ProtocolError::MalformedPayload(
                    "KEY frame without a key".to_string(),
                ));
            }
            return Ok(ClientCommand::Key(rest.to_string()));
        }
        if let Some(rest) = frame.strip_prefix(ECHO_PREFIX) {
            return Ok(ClientCommand::Echo(rest.to_string()));
        }
        Err(ProtocolError::UnknownCommand(frame.to_string()))
    }
}

fn floor_component(v: f64) -> i32 {
    // `as` saturates at the i32 bounds and maps NaN to 0.
    v.floor() as i32
}

// ── Tests ─────────────────────────────────────────────────────────────────────
