//! End-to-end polling scenarios against a virtual NES pad.

use padsync::{
    DeviceProfile, Manager, Message, NesButton, RecordingSink, SlotError, VirtualDevice,
    VirtualFeed,
};

/// NES report with the four meaningful bytes set (x, y, A/B, SELECT/START).
fn report(x: u8, y: u8, ab: u8, sel_start: u8) -> Vec<u8> {
    vec![x, y, 0x00, ab, sel_start, 0x00, 0x00, 0x00]
}

fn neutral() -> Vec<u8> {
    report(0xF0, 0xF0, 0x00, 0x00)
}

fn setup() -> (Manager<RecordingSink>, VirtualFeed) {
    let mut mgr = Manager::new(&DeviceProfile::nes(), RecordingSink::new()).unwrap();
    let pad = VirtualDevice::new("virtual:0", "Virtual NES");
    let feed = pad.feed_handle();
    assert_eq!(mgr.add_device(pad), Ok(0));
    (mgr, feed)
}

fn state(b: NesButton, pressed: bool) -> Message {
    Message::new("/state", vec![0, i32::from(b.id()), i32::from(pressed)])
}

#[test]
fn first_report_with_up_held_emits_one_press() {
    let (mut mgr, feed) = setup();
    feed.feed(report(0xF0, 0x00, 0x00, 0x00));

    let stats = mgr.tick();

    assert_eq!(stats.transitions, 1);
    assert_eq!(mgr.sink().messages(), [state(NesButton::Up, true)]);
}

#[test]
fn held_button_does_not_repeat() {
    let (mut mgr, feed) = setup();
    feed.feed(report(0xF0, 0x00, 0x00, 0x00));
    mgr.tick();
    mgr.sink_mut().take();

    feed.feed(report(0xF0, 0x00, 0x00, 0x00));
    let stats = mgr.tick();

    assert_eq!(stats.reports, 1);
    assert_eq!(stats.transitions, 0);
    assert!(mgr.sink().messages().is_empty());
}

#[test]
fn a_and_b_together_emit_in_button_order() {
    let (mut mgr, feed) = setup();
    feed.feed(neutral());
    mgr.tick();

    feed.feed(report(0xF0, 0xF0, 0x03, 0x00));
    mgr.tick();

    assert_eq!(
        mgr.sink().messages(),
        [state(NesButton::A, true), state(NesButton::B, true)]
    );
}

#[test]
fn empty_read_changes_nothing() {
    let (mut mgr, feed) = setup();
    feed.feed(report(0x00, 0xF0, 0x00, 0x01));
    mgr.tick();
    let before = mgr.snapshot();
    let sent = mgr.sink().messages().len();

    feed.feed_empty();
    let stats = mgr.tick();

    assert_eq!(stats.idle, 1);
    assert_eq!(stats.transitions, 0);
    assert_eq!(mgr.sink().messages().len(), sent);
    assert_eq!(mgr.snapshot(), before);
}

#[test]
fn malformed_report_changes_nothing() {
    let (mut mgr, feed) = setup();
    feed.feed(report(0xFF, 0xF0, 0x02, 0x00));
    mgr.tick();
    let before = mgr.snapshot();
    let sent = mgr.sink().messages().len();

    // Would release everything if it were decoded.
    feed.feed(vec![0xF0, 0xF0, 0x00, 0x00, 0x00]);
    feed.feed(vec![0xF0; 64]);
    assert_eq!(mgr.tick().malformed, 1);
    assert_eq!(mgr.tick().malformed, 1);

    assert_eq!(mgr.sink().messages().len(), sent);
    assert_eq!(mgr.snapshot(), before);
}

#[test]
fn press_then_release_round_trip() {
    let (mut mgr, feed) = setup();
    feed.feed(report(0xF0, 0xF0, 0x00, 0x02));
    feed.feed(neutral());
    mgr.tick();
    mgr.tick();

    assert_eq!(
        mgr.sink().messages(),
        [state(NesButton::Start, true), state(NesButton::Start, false)]
    );
}

#[test]
fn axis_flip_releases_before_pressing() {
    let (mut mgr, feed) = setup();
    feed.feed(report(0x00, 0xF0, 0x00, 0x00));
    feed.feed(report(0xFF, 0xF0, 0x00, 0x00));
    mgr.tick();
    mgr.tick();

    assert_eq!(
        mgr.sink().messages(),
        [
            state(NesButton::Left, true),
            state(NesButton::Left, false),
            state(NesButton::Right, true),
        ]
    );
}

#[test]
fn two_pads_are_tracked_separately() {
    let (mut mgr, feed0) = setup();
    let pad1 = VirtualDevice::new("virtual:1", "Second pad");
    let feed1 = pad1.feed_handle();
    assert_eq!(mgr.add_device(pad1), Ok(1));

    feed0.feed(report(0xF0, 0xF0, 0x01, 0x00));
    feed1.feed(report(0xF0, 0xF0, 0x01, 0x00));
    mgr.tick();

    let msgs = mgr.sink().messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0].args, vec![0, 6, 1]);
    assert_eq!(msgs[1].args, vec![1, 6, 1]);

    assert!(matches!(
        mgr.add_device(VirtualDevice::new("virtual:2", "Third pad")),
        Err(SlotError::CapacityExceeded { capacity: 2 })
    ));
    assert_eq!(mgr.slots().len(), 2);
}

#[test]
fn failing_pad_does_not_starve_the_other() {
    let (mut mgr, feed0) = setup();
    let pad1 = VirtualDevice::new("virtual:1", "Second pad");
    let feed1 = pad1.feed_handle();
    mgr.add_device(pad1).unwrap();

    feed0.feed_error("device removed");
    feed1.feed(report(0xF0, 0xFF, 0x00, 0x00));
    let stats = mgr.tick();

    assert_eq!(stats.read_errors, 1);
    assert_eq!(stats.transitions, 1);
    assert_eq!(mgr.sink().messages()[0].args, vec![1, 1, 1]);
    assert!(mgr.slots().is_active(0));
}
