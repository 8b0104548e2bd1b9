//! Protocol module containing the command types and the text codec.

pub mod codec;
pub mod messages;

pub use codec::{encode_command, encode_move, move_command, ProtocolError};
pub use messages::*;
