//! Line-delimited JSON surface event source.
//!
//! The command-line controller has no touch screen of its own; raw surface
//! events arrive one JSON object per line (normally on stdin), for example
//! from a front-end that captures the actual pointer:
//!
//! ```text
//! {"type":"mousedown","offset_x":10,"offset_y":10}
//! {"type":"mousemove","offset_x":15,"offset_y":12}
//! {"type":"mouseup"}
//! ```
//!
//! Blank lines are skipped.  A line that is not a valid event is logged and
//! skipped; one bad line never ends the stream.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::RawSurfaceEvent;

/// Reads events from `reader` until end of input, forwarding each one to `tx`.
///
/// Returns the number of events forwarded.  Stops early when the receiver is
/// dropped.
pub async fn read_events<R>(reader: R, tx: mpsc::Sender<RawSurfaceEvent>) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    let mut line_no = 0usize;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("event source read failed: {e}");
                break;
            }
        };
        line_no += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event: RawSurfaceEvent = match serde_json::from_str(trimmed) {
            Ok(event) => event,
            Err(e) => {
                warn!("line {line_no}: ignoring invalid surface event: {e}");
                continue;
            }
        };

        if tx.send(event).await.is_err() {
            debug!("event consumer gone; stopping event source");
            break;
        }
        forwarded += 1;
    }

    debug!("event source finished after {forwarded} events");
    forwarded
}

// ── Tests ─────────────────────────────────────────────────────────────────────
