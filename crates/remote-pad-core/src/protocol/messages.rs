//! Command types carried over the remote-pad text protocol.
//!
//! # Wire grammar
//!
//! Every frame is one line of text.  Client → host:
//!
//! ```text
//! MOVE:<dx>;<dy>     relative pointer motion, integers
//! CLICK              primary-button click
//! MEDIA:<cmd>        media key, <cmd> is one of MediaCommand
//! KEY:<key>          one key-down, platform key identifier, uninterpreted
//! ECHO:<text>        host replies with <text>
//! CLOSE              host replies BYE
//! ```
//!
//! Host → client frames carry no defined semantics; the client classifies them
//! as [`ServerFrame`] only for logging.

use std::fmt;
use std::str::FromStr;

use crate::protocol::codec::ProtocolError;

/// Media-key commands available on the control strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCommand {
    Play,
    Pause,
    Previous,
    Next,
    VolumeUp,
    VolumeDown,
    Mute,
}

impl MediaCommand {
    /// Every media command, in control-strip order.
    pub const ALL: [MediaCommand; 7] = [
        MediaCommand::Previous,
        MediaCommand::Play,
        MediaCommand::Pause,
        MediaCommand::Next,
        MediaCommand::VolumeDown,
        MediaCommand::VolumeUp,
        MediaCommand::Mute,
    ];

    /// Returns the wire token for this command.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaCommand::Play => "play",
            MediaCommand::Pause => "pause",
            MediaCommand::Previous => "previous",
            MediaCommand::Next => "next",
            MediaCommand::VolumeUp => "volume_up",
            MediaCommand::VolumeDown => "volume_down",
            MediaCommand::Mute => "mute",
        }
    }
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaCommand {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "play" => Ok(MediaCommand::Play),
            "pause" => Ok(MediaCommand::Pause),
            "previous" => Ok(MediaCommand::Previous),
            "next" => Ok(MediaCommand::Next),
            "volume_up" => Ok(MediaCommand::VolumeUp),
            "volume_down" => Ok(MediaCommand::VolumeDown),
            "mute" => Ok(MediaCommand::Mute),
            other => Err(ProtocolError::UnknownMediaCommand(other.to_string())),
        }
    }
}

/// A command sent from the controller to the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Relative pointer motion in whole host pixels.
    Move { dx: i32, dy: i32 },
    /// Primary-button click.
    Click,
    /// Media key press.
    Media(MediaCommand),
    /// One key-down carrying the platform key identifier (e.g. `"a"`, `"Enter"`).
    Key(String),
    /// Diagnostic echo; the host replies with the same text.
    Echo(String),
    /// Asks the host to end the session.
    Close,
}

/// A text frame received from the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    /// The host acknowledged a [`ClientCommand::Close`].
    Bye,
    /// Any other text; observed but not interpreted.
    Text(String),
}

impl ServerFrame {
    /// Classifies an inbound text frame.  Never fails.
    pub fn parse(text: &str) -> Self {
        if text == "BYE" {
            ServerFrame::Bye
        } else {
            ServerFrame::Text(text.to_string())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
