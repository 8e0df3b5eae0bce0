#![forbid(unsafe_code)]

//! Behavioral properties of the tour state machine.
//!
//! Run:
//!   cargo test -p sidecar-core --test tour_properties

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use sidecar_core::{
    NudgeEscalator, Offset, Point, Step, StepRegistry, TourCommand, TourEvent, TourState,
    TourStateMachine,
};
use web_time::Duration;

// ── Fixtures ──────────────────────────────────────────────────────────────

/// Steps 0 and 4 untargeted, 1-3 targeted.
fn five_step_script() -> StepRegistry {
    StepRegistry::new(vec![
        Step::new("welcome", "Welcome", "Here is the workspace."),
        Step::new("profile", "Profile", "Your profile lives here.")
            .target("profile-panel")
            .action_hint("Open the profile panel"),
        Step::new("questions", "Questions", "Answer a question.")
            .target("qa-list")
            .action_hint("Pick a question"),
        Step::new("logs", "Logs", "Filter the application log.")
            .target("log-filter")
            .action_hint("Type a filter"),
        Step::new("finish", "All set", "Enjoy."),
    ])
    .unwrap()
}

fn machine(steps: StepRegistry) -> (TourStateMachine, Rc<RefCell<Vec<bool>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let machine = TourStateMachine::new(
        steps,
        NudgeEscalator::new(Duration::from_millis(2500), "try it first"),
        move |flag| sink.borrow_mut().push(flag),
    );
    (machine, calls)
}

// ── Gating ────────────────────────────────────────────────────────────────

#[test]
fn unperformed_target_blocks_once_then_escalates() {
    let (mut m, _) = machine(five_step_script());
    m.next();
    assert_eq!(m.current_index(), 1);

    let first = m.next();
    assert_eq!(m.current_index(), 1);
    assert!(matches!(first, Some(TourEvent::NudgeShown { .. })));
    assert!(m.visible_nudge().is_some());

    m.next();
    assert_eq!(m.current_index(), 2);
}

#[test]
fn performed_target_advances_without_nudge() {
    let (mut m, _) = machine(five_step_script());
    m.next();
    m.mark_current_action_performed();
    m.next();
    assert_eq!(m.current_index(), 2);
    assert_eq!(m.nudges_shown(), 0);
    assert!(m.visible_nudge().is_none());
}

#[test]
fn back_is_noop_at_zero_and_decrements_elsewhere() {
    let (mut m, _) = machine(five_step_script());
    let before = m.state().clone();
    assert!(m.back().is_none());
    assert_eq!(m.state(), &before);

    m.jump_to(3);
    m.back();
    assert_eq!(m.current_index(), 2);
}

#[test]
fn skip_reports_current_flag_exactly_once_from_any_index() {
    for index in 0..5 {
        for flag in [true, false] {
            let (mut m, calls) = machine(five_step_script());
            m.jump_to(index);
            m.set_dont_show_again(flag);
            m.skip();
            m.skip();
            m.next();
            assert_eq!(*calls.borrow(), vec![flag], "index {index}");
        }
    }
}

#[test]
fn step_scoped_state_resets_on_every_index_change() {
    let (mut m, _) = machine(five_step_script());
    m.next();
    m.next(); // nudge on step 1
    m.begin_drag(Point::new(50.0, 50.0));
    m.update_drag(Point::new(80.0, 40.0));
    assert_eq!(m.state().nudge_count(), 1);
    assert_eq!(m.state().drag_offset(), Offset::new(30.0, -10.0));

    m.back();
    assert_eq!(m.state().drag_offset(), Offset::ZERO);
    assert_eq!(m.state().nudge_count(), 0);

    m.begin_drag(Point::new(1.0, 1.0));
    m.update_drag(Point::new(5.0, 5.0));
    m.next();
    assert_eq!(m.state().drag_offset(), Offset::ZERO);
    assert_eq!(m.state().nudge_count(), 0);
}

// ── End-to-end scripts ────────────────────────────────────────────────────

#[test]
fn cooperative_user_reaches_last_step_in_four_nexts() {
    let (mut m, calls) = machine(five_step_script());
    let mut nexts = 0;
    while m.current_index() < 4 {
        if m.current_step().is_targeted() {
            m.mark_current_action_performed();
        }
        m.next();
        nexts += 1;
        assert!(nexts <= 10, "tour did not reach the last step");
    }
    assert_eq!(nexts, 4);
    assert!(!m.is_completed());
    assert!(calls.borrow().is_empty());

    // Next on the last step finishes the tour.
    assert!(matches!(m.next(), Some(TourEvent::Completed { .. })));
    assert_eq!(m.nudges_shown(), 0);
    assert_eq!(*calls.borrow(), vec![true]);
}

#[test]
fn unresponsive_user_finishes_in_eight_nexts_with_three_nudges() {
    let (mut m, calls) = machine(five_step_script());
    let mut nexts = 0;
    let mut nudge_events = 0;
    while !m.is_completed() {
        if let Some(TourEvent::NudgeShown { .. }) = m.next() {
            nudge_events += 1;
        }
        nexts += 1;
        assert!(nexts <= 20, "tour did not terminate");
    }
    assert_eq!(nexts, 8);
    assert_eq!(nudge_events, 3);
    assert_eq!(m.nudges_shown(), 3);
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn nudge_expiry_does_not_reopen_the_gate() {
    let (mut m, _) = machine(five_step_script());
    m.next();
    m.next();
    assert!(m.tick(Duration::from_secs(3)));
    m.next();
    assert_eq!(m.current_index(), 2, "second attempt escalates even after hide");
}

// ── Invariants under arbitrary command sequences ──────────────────────────

fn arb_command() -> impl Strategy<Value = TourCommand> {
    prop_oneof![
        4 => Just(TourCommand::Next),
        2 => Just(TourCommand::Back),
        1 => Just(TourCommand::Skip),
        1 => (0usize..12).prop_map(TourCommand::JumpTo),
        1 => any::<bool>().prop_map(TourCommand::SetDontShowAgain),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn commands_keep_index_in_range_and_sink_at_most_once(
        commands in prop::collection::vec(arb_command(), 0..64),
        interactions in prop::collection::vec(any::<bool>(), 0..64),
    ) {
        let steps = five_step_script();
        let (mut m, calls) = machine(steps.clone());
        for (i, command) in commands.iter().enumerate() {
            if interactions.get(i).copied().unwrap_or(false) {
                m.mark_current_action_performed();
            }
            let before = m.current_index();
            let event = m.apply(*command);
            prop_assert!(m.current_index() < steps.len());
            if let Some(TourEvent::StepChanged { from, to, .. }) = event {
                prop_assert_eq!(from, before);
                prop_assert_eq!(to, m.current_index());
                prop_assert_eq!(m.state().nudge_count(), 0);
                prop_assert_eq!(m.state().drag_offset(), Offset::ZERO);
            }
            prop_assert!(calls.borrow().len() <= 1);
            prop_assert_eq!(calls.borrow().len() == 1, m.is_completed());
        }
    }

    #[test]
    fn pure_transitions_match_machine(
        commands in prop::collection::vec(arb_command(), 0..32),
    ) {
        let steps = five_step_script();
        let (mut m, _) = machine(steps.clone());
        let mut state = TourState::new();
        for command in commands {
            let t = state.apply(&steps, command);
            let event = m.apply(command);
            prop_assert_eq!(&t.event, &event);
            state = t.state;
            prop_assert_eq!(&state, m.state());
        }
    }
}
