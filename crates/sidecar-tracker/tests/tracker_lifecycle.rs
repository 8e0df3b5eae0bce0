#![forbid(unsafe_code)]

//! Tracker lifecycle against the in-memory host page.
//!
//! Run:
//!   cargo test -p sidecar-tracker --test tracker_lifecycle

use proptest::prelude::*;
use sidecar_core::{Rect, TrackerConfig};
use sidecar_harness::{FakeHost, REFERENCE_TARGETS, five_step_steps, reference_host};
use sidecar_tracker::{InteractionKind, TargetTracker, TrackerEvent, TrackingPhase};
use web_time::Duration;

const SETTLE: Duration = Duration::from_millis(350);
const POLL: Duration = Duration::from_millis(500);

fn tracker() -> TargetTracker {
    TargetTracker::new(TrackerConfig::default())
}

#[test]
fn walking_every_step_leaves_no_subscriptions_behind() {
    let mut host = reference_host();
    let mut tracker = tracker();
    for step in five_step_steps() {
        tracker.activate(&mut host, &step);
        let expected = if step.is_targeted() { 2 } else { 0 };
        assert_eq!(host.live_subscriptions(), expected, "step {}", step.id);
        tracker.tick(&mut host, SETTLE);
    }
    tracker.teardown(&mut host);
    assert_eq!(host.live_subscriptions(), 0);
}

#[test]
fn scroll_happens_before_the_settled_measurement() {
    let mut host = reference_host().centering_scroll(900.0);
    let mut tracker = tracker();
    let steps = five_step_steps();

    assert!(tracker.activate(&mut host, &steps[2]).is_empty());
    assert_eq!(host.scroll_requests().len(), 1);
    assert_eq!(host.scroll_requests()[0].as_str(), REFERENCE_TARGETS[1]);

    assert!(tracker.tick(&mut host, Duration::from_millis(349)).is_empty());
    let events = tracker.tick(&mut host, Duration::from_millis(1));
    let [TrackerEvent::Measured(rect)] = events.as_slice() else {
        panic!("expected one measurement, got {events:?}");
    };
    assert_eq!(rect.center_y(), 450.0);
}

#[test]
fn stale_settle_timer_never_fires_for_the_new_step() {
    let mut host = reference_host();
    let mut tracker = tracker();
    let steps = five_step_steps();

    tracker.activate(&mut host, &steps[1]);
    tracker.tick(&mut host, Duration::from_millis(200));
    tracker.activate(&mut host, &steps[2]);

    // The first step would have settled here.
    assert!(tracker.tick(&mut host, Duration::from_millis(200)).is_empty());
    let events = tracker.tick(&mut host, Duration::from_millis(150));
    assert_eq!(
        events,
        vec![TrackerEvent::Measured(Rect::new(1080.0, 360.0, 320.0, 240.0))]
    );
}

#[test]
fn removed_target_falls_back_until_it_returns() {
    let mut host = reference_host();
    let mut tracker = tracker();
    let step = &five_step_steps()[3];
    tracker.activate(&mut host, step);
    tracker.tick(&mut host, SETTLE);

    let rect = host.remove_target(REFERENCE_TARGETS[2]).unwrap();
    host.push_resize();
    assert_eq!(
        tracker.tick(&mut host, Duration::from_millis(1)),
        vec![TrackerEvent::Lost]
    );
    assert_eq!(tracker.current(), None);

    host.insert_target(REFERENCE_TARGETS[2], rect);
    tracker.tick(&mut host, POLL);
    assert_eq!(tracker.phase(), Some(TrackingPhase::Settling));
    assert_eq!(
        tracker.tick(&mut host, SETTLE),
        vec![TrackerEvent::Measured(rect)]
    );
}

#[test]
fn late_target_is_picked_up_by_polling() {
    let mut host = FakeHost::new();
    let mut tracker = tracker();
    let step = &five_step_steps()[1];

    assert_eq!(tracker.activate(&mut host, step), vec![TrackerEvent::Lost]);
    assert!(host.scroll_requests().is_empty());

    host.insert_target(REFERENCE_TARGETS[0], Rect::new(1100.0, 80.0, 200.0, 50.0));
    tracker.tick(&mut host, POLL);
    assert_eq!(host.scroll_requests().len(), 1);
    assert_eq!(
        tracker.tick(&mut host, SETTLE),
        vec![TrackerEvent::Measured(Rect::new(1100.0, 80.0, 200.0, 50.0))]
    );
}

#[test]
fn moved_target_is_seen_on_next_poll() {
    let mut host = reference_host();
    let mut tracker = tracker();
    tracker.activate(&mut host, &five_step_steps()[1]);
    tracker.tick(&mut host, SETTLE);

    let moved = Rect::new(1080.0, 150.0, 320.0, 96.0);
    host.move_target(REFERENCE_TARGETS[0], moved);
    assert!(tracker.tick(&mut host, Duration::from_millis(499)).is_empty());
    assert_eq!(
        tracker.tick(&mut host, Duration::from_millis(1)),
        vec![TrackerEvent::Measured(moved)]
    );
}

#[test]
fn interactions_on_previous_target_are_not_reported() {
    let mut host = reference_host();
    let mut tracker = tracker();
    let steps = five_step_steps();

    tracker.activate(&mut host, &steps[1]);
    tracker.activate(&mut host, &steps[2]);
    assert_eq!(host.click(REFERENCE_TARGETS[0]), 0);
    assert!(
        !tracker
            .tick(&mut host, Duration::ZERO)
            .contains(&TrackerEvent::ActionPerformed)
    );

    assert_eq!(host.interact(REFERENCE_TARGETS[1], InteractionKind::TextInput), 1);
    assert_eq!(
        tracker.tick(&mut host, Duration::ZERO),
        vec![TrackerEvent::ActionPerformed]
    );
}

#[derive(Debug, Clone)]
enum Op {
    Activate(usize),
    Tick(u64),
    Remove(usize),
    Restore(usize),
    Resize,
    Click(usize),
    Teardown,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (0usize..5).prop_map(Op::Activate),
        4 => (0u64..800).prop_map(Op::Tick),
        1 => (0usize..3).prop_map(Op::Remove),
        1 => (0usize..3).prop_map(Op::Restore),
        1 => Just(Op::Resize),
        1 => (0usize..3).prop_map(Op::Click),
        1 => Just(Op::Teardown),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn subscriptions_are_bounded_and_released(ops in prop::collection::vec(arb_op(), 0..48)) {
        let steps = five_step_steps();
        let original = reference_host();
        let mut host = reference_host();
        let mut tracker = tracker();
        let mut actions_for_scope = 0;

        for op in ops {
            match op {
                Op::Activate(i) => {
                    tracker.activate(&mut host, &steps[i]);
                    actions_for_scope = 0;
                }
                Op::Tick(ms) => {
                    let events = tracker.tick(&mut host, Duration::from_millis(ms));
                    actions_for_scope += events
                        .iter()
                        .filter(|e| **e == TrackerEvent::ActionPerformed)
                        .count();
                    for event in events {
                        if let TrackerEvent::Measured(rect) = event {
                            prop_assert!(rect.is_measurable());
                        }
                    }
                }
                Op::Remove(t) => {
                    host.remove_target(REFERENCE_TARGETS[t]);
                }
                Op::Restore(t) => {
                    let id = sidecar_core::TargetId::new(REFERENCE_TARGETS[t]);
                    if let Some(rect) = sidecar_tracker::TargetLocator::locate(&original, &id) {
                        host.insert_target(REFERENCE_TARGETS[t], rect);
                    }
                }
                Op::Resize => host.push_resize(),
                Op::Click(t) => {
                    host.click(REFERENCE_TARGETS[t]);
                }
                Op::Teardown => {
                    tracker.teardown(&mut host);
                    actions_for_scope = 0;
                }
            }
            prop_assert!(host.live_subscriptions() <= 2);
            prop_assert!(actions_for_scope <= 1);
        }

        tracker.teardown(&mut host);
        prop_assert_eq!(host.live_subscriptions(), 0);
    }
}
