//! Raw capture-surface events and their normalization.
//!
//! Mouse and touch events arrive in different shapes: a mouse event carries
//! offsets relative to the surface, a touch event carries lists of touch
//! points.  [`RawSurfaceEvent::normalize`] collapses both into
//! [`SurfaceEvent`], which carries a single [`Position`] where one is needed.
//! Nothing past this boundary has to know which device produced the input.
//!
//! # JSON representation
//!
//! Raw events are read as JSON objects tagged by `"type"`, mirroring the DOM
//! event names:
//!
//! ```json
//! {"type":"mousedown","offset_x":10,"offset_y":10}
//! {"type":"touchmove","changed_touches":[{"client_x":15,"client_y":12}]}
//! {"type":"keydown","key":"Enter"}
//! {"type":"media","command":"volume_up"}
//! ```

use serde::{Deserialize, Serialize};

use remote_pad_core::{MediaCommand, Position};

/// One touch point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

impl From<TouchPoint> for Position {
    fn from(t: TouchPoint) -> Self {
        Position::new(t.client_x, t.client_y)
    }
}

/// A device-shaped event as delivered by the capture surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawSurfaceEvent {
    #[serde(rename = "mousedown")]
    MouseDown { offset_x: f64, offset_y: f64 },
    #[serde(rename = "mousemove")]
    MouseMove { offset_x: f64, offset_y: f64 },
    #[serde(rename = "mouseup")]
    MouseUp,
    #[serde(rename = "touchstart")]
    TouchStart {
        #[serde(default)]
        touches: Vec<TouchPoint>,
        #[serde(default)]
        changed_touches: Vec<TouchPoint>,
    },
    #[serde(rename = "touchmove")]
    TouchMove {
        #[serde(default)]
        changed_touches: Vec<TouchPoint>,
    },
    #[serde(rename = "touchend")]
    TouchEnd,
    #[serde(rename = "touchcancel")]
    TouchCancel,
    /// The synthetic click a surface fires after a press/release pair.
    Click,
    #[serde(rename = "keydown")]
    KeyDown { key: String },
    /// A media button on the control strip; `command` is the wire token.
    Media { command: String },
    SensitivityUp,
    SensitivityDown,
    /// The reconnect button on the status strip.
    Reconnect,
}

/// A device-independent surface event.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// Pointer or first finger went down at this position.
    Press(Position),
    /// Pointer or first changed finger moved to this position.
    Move(Position),
    /// Pointer or finger lifted, or the touch was cancelled.
    Release,
    /// Synthetic click after a press/release pair.
    Click,
    /// One key-down with its platform key identifier.
    Key(String),
    Media(MediaCommand),
    SensitivityUp,
    SensitivityDown,
    Reconnect,
}

impl RawSurfaceEvent {
    /// Converts a raw event into a [`SurfaceEvent`].
    ///
    /// Returns `None` for malformed input that must be ignored: a touch event
    /// without any touch point, an empty key, or an unknown media command.
    /// Only the first touch point is used; further fingers are ignored.
    pub fn normalize(self) -> Option<SurfaceEvent> {
        match self {
            RawSurfaceEvent::MouseDown { offset_x, offset_y } => {
                Some(SurfaceEvent::Press(Position::new(offset_x, offset_y)))
            }
            RawSurfaceEvent::MouseMove { offset_x, offset_y } => {
                Some(SurfaceEvent::Move(Position::new(offset_x, offset_y)))
            }
            RawSurfaceEvent::TouchStart {
                touches,
                changed_touches,
            } => touches
                .first()
                .or_else(|| changed_touches.first())
                .map(|t| SurfaceEvent::Press((*t).into())),
            RawSurfaceEvent::TouchMove { changed_touches } => changed_touches
                .first()
                .map(|t| SurfaceEvent::Move((*t).into())),
            RawSurfaceEvent::MouseUp | RawSurfaceEvent::TouchEnd | RawSurfaceEvent::TouchCancel => {
                Some(SurfaceEvent::Release)
            }
            RawSurfaceEvent::Click => Some(SurfaceEvent::Click),
            RawSurfaceEvent::KeyDown { key } if key.is_empty() => None,
            RawSurfaceEvent::KeyDown { key } => Some(SurfaceEvent::Key(key)),
            RawSurfaceEvent::Media { command } => {
                command.parse::<MediaCommand>().ok().map(SurfaceEvent::Media)
            }
            RawSurfaceEvent::SensitivityUp => Some(SurfaceEvent::SensitivityUp),
            RawSurfaceEvent::SensitivityDown => Some(SurfaceEvent::SensitivityDown),
            RawSurfaceEvent::Reconnect => Some(SurfaceEvent::Reconnect),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
