//! End-to-end controller scenarios over the in-memory transport.
//!
//! Every test drives a real `SurfaceController` and `ConnectionManager`; only
//! the network is replaced by `MockConnector`.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use remote_pad_client::application::{
    ChannelEvent, ConnectionManager, SensitivitySetting, SurfaceController,
};
use remote_pad_client::domain::{RawSurfaceEvent, SurfaceEvent};
use remote_pad_client::infrastructure::event_source::read_events;
use remote_pad_client::infrastructure::mock::{MockConnector, MockTransport};
use remote_pad_client::infrastructure::preferences::{MemoryPreferenceStore, TomlPreferenceStore};
use remote_pad_core::{ConnectionStatus, Position};

const THROTTLE: Duration = Duration::from_millis(20);

fn controller() -> (
    SurfaceController,
    mpsc::UnboundedReceiver<ChannelEvent>,
    MockTransport,
) {
    let (connector, transport) = MockConnector::new();
    let (manager, events) = ConnectionManager::new(Box::new(connector));
    let setting = SensitivitySetting::load(Box::new(MemoryPreferenceStore::new()));
    (SurfaceController::new(manager, setting, THROTTLE), events, transport)
}

fn pump(controller: &mut SurfaceController, events: &mut mpsc::UnboundedReceiver<ChannelEvent>) {
    while let Ok(ev) = events.try_recv() {
        controller.handle_channel_event(ev);
    }
}

fn ms(base: Instant, offset: u64) -> Instant {
    base + Duration::from_millis(offset)
}

#[test]
fn test_drag_then_tap_emits_move_then_click() {
    // Arrange
    let (mut ctl, mut events, transport) = controller();
    ctl.mount();
    transport.accept(0);
    pump(&mut ctl, &mut events);
    let t0 = Instant::now();

    // Act: drag from (10,10) to (15,12), release; then a tap elsewhere
    ctl.handle_at(SurfaceEvent::Press(Position::new(10.0, 10.0)), t0);
    ctl.handle_at(SurfaceEvent::Move(Position::new(15.0, 12.0)), ms(t0, 25));
    ctl.handle_at(SurfaceEvent::Release, ms(t0, 30));
    ctl.handle_at(SurfaceEvent::Click, ms(t0, 31));
    ctl.handle_at(SurfaceEvent::Press(Position::new(80.0, 40.0)), ms(t0, 400));
    ctl.handle_at(SurfaceEvent::Release, ms(t0, 450));
    ctl.handle_at(SurfaceEvent::Click, ms(t0, 451));

    // Assert
    assert_eq!(transport.sent(0), vec!["MOVE:5;2", "CLICK"]);
}

#[test]
fn test_touch_gesture_uses_first_finger() {
    let (mut ctl, mut events, transport) = controller();
    ctl.mount();
    transport.accept(0);
    pump(&mut ctl, &mut events);

    for json in [
        r#"{"type":"touchstart","touches":[{"client_x":100,"client_y":100},{"client_x":5,"client_y":5}]}"#,
        r#"{"type":"touchmove","changed_touches":[{"client_x":90,"client_y":103},{"client_x":0,"client_y":0}]}"#,
        r#"{"type":"touchend"}"#,
    ] {
        ctl.handle_raw(serde_json::from_str(json).unwrap());
    }

    assert_eq!(transport.sent(0), vec!["MOVE:-10;3"]);
}

#[test]
fn test_lost_link_drops_input_until_reconnected() {
    // Arrange
    let (mut ctl, mut events, transport) = controller();
    ctl.mount();
    transport.accept(0);
    pump(&mut ctl, &mut events);

    // Act: host goes away, user keeps typing, then presses reconnect
    transport.close_from_remote(0);
    pump(&mut ctl, &mut events);
    ctl.handle(SurfaceEvent::Key("a".into()));
    assert_eq!(ctl.status(), ConnectionStatus::Disconnected);

    ctl.handle(SurfaceEvent::Reconnect);
    ctl.handle(SurfaceEvent::Reconnect);
    assert_eq!(ctl.status(), ConnectionStatus::Connecting);
    ctl.handle(SurfaceEvent::Key("b".into()));

    transport.accept(1);
    pump(&mut ctl, &mut events);
    ctl.handle(SurfaceEvent::Key("c".into()));

    // Assert
    assert_eq!(transport.open_count(), 2);
    assert!(transport.sent(0).is_empty());
    assert_eq!(transport.sent(1), vec!["KEY:c"]);
    assert_eq!(ctl.status(), ConnectionStatus::Connected);
}

#[test]
fn test_error_is_reported_and_recoverable() {
    let (mut ctl, mut events, transport) = controller();
    ctl.mount();

    transport.fail(0);
    pump(&mut ctl, &mut events);
    assert_eq!(ctl.status(), ConnectionStatus::Error);
    assert!(ctl.status().can_reconnect());

    ctl.handle(SurfaceEvent::Reconnect);
    transport.accept(1);
    pump(&mut ctl, &mut events);
    assert_eq!(ctl.status(), ConnectionStatus::Connected);
}

#[test]
fn test_sensitivity_survives_restart() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");

    {
        let (connector, _transport) = MockConnector::new();
        let (manager, _events) = ConnectionManager::new(Box::new(connector));
        let setting = SensitivitySetting::load(Box::new(TomlPreferenceStore::open(&path).unwrap()));
        let mut ctl = SurfaceController::new(manager, setting, THROTTLE);

        // Act
        ctl.handle(SurfaceEvent::SensitivityUp);
        ctl.handle(SurfaceEvent::SensitivityUp);
    }

    // Assert
    let (connector, _transport) = MockConnector::new();
    let (manager, _events) = ConnectionManager::new(Box::new(connector));
    let setting = SensitivitySetting::load(Box::new(TomlPreferenceStore::open(&path).unwrap()));
    let ctl = SurfaceController::new(manager, setting, THROTTLE);
    assert!((ctl.sensitivity().value() - 1.2).abs() < 1e-9);
}

#[tokio::test]
async fn test_run_relays_json_lines_until_input_ends() {
    // Arrange
    let (ctl, events, transport) = controller();
    let mut status = ctl.subscribe_status();
    let (tx, rx) = mpsc::channel(16);
    let running = Arc::new(AtomicBool::new(true));
    let task = tokio::spawn(ctl.run(rx, events, running));

    tokio::time::timeout(Duration::from_secs(5), async {
        while transport.open_count() == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("controller never connected");
    transport.accept(0);
    tokio::time::timeout(Duration::from_secs(5), status.wait_for(|s| *s == ConnectionStatus::Connected))
        .await
        .expect("status never became connected")
        .unwrap();

    // Act
    let input: &[u8] = concat!(
        r#"{"type":"mousedown","offset_x":10,"offset_y":10}"#, "\n",
        r#"{"type":"mousemove","offset_x":15,"offset_y":12}"#, "\n",
        r#"{"type":"mouseup"}"#, "\n",
        r#"{"type":"click"}"#, "\n",
        "garbage\n",
        r#"{"type":"media","command":"mute"}"#, "\n",
        r#"{"type":"keydown","key":"Enter"}"#, "\n",
    )
    .as_bytes();
    read_events(input, tx).await;
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("controller did not stop")
        .unwrap();

    // Assert
    assert_eq!(transport.sent(0), vec!["MOVE:5;2", "MEDIA:mute", "KEY:Enter"]);
    assert!(transport.is_closed(0));
}

#[test]
fn test_unparseable_events_are_ignored() {
    let (mut ctl, mut events, transport) = controller();
    ctl.mount();
    transport.accept(0);
    pump(&mut ctl, &mut events);

    ctl.handle_raw(RawSurfaceEvent::Media {
        command: "eject".into(),
    });
    ctl.handle_raw(RawSurfaceEvent::TouchMove {
        changed_touches: vec![],
    });

    assert!(transport.sent(0).is_empty());
}
