#![forbid(unsafe_code)]

//! Stateful tour orchestration.
//!
//! [`TourStateMachine`] wraps the pure [`TourState`] transitions with the
//! side effects they imply: showing and hiding nudges, resetting the drag
//! controller on step change, and invoking the completion sink.
//!
//! The completion sink is called exactly once per machine, either from
//! [`TourStateMachine::next`] on the last step or from
//! [`TourStateMachine::skip`]. Whatever the sink does (including panicking)
//! is the caller's business; the machine neither catches nor retries.

use std::fmt;

use web_time::Duration;

use crate::drag::DragController;
use crate::geometry::{Offset, Point, Rect};
use crate::nudge::{NudgeEscalator, VisibleNudge};
use crate::state::{TourCommand, TourEvent, TourPhase, TourState, Transition};
use crate::step::{Step, StepId, StepRegistry};

/// Receives the user's "don't show again" choice when the tour ends.
pub trait CompletionSink {
    fn complete(&mut self, dont_show_again: bool);
}

impl<F: FnMut(bool)> CompletionSink for F {
    fn complete(&mut self, dont_show_again: bool) {
        self(dont_show_again)
    }
}

/// Owns the tour state and drives every transition.
pub struct TourStateMachine {
    steps: StepRegistry,
    state: TourState,
    nudges: NudgeEscalator,
    drag: DragController,
    sink: Box<dyn CompletionSink>,
    completion_delivered: bool,
}

impl fmt::Debug for TourStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourStateMachine")
            .field("step_count", &self.steps.len())
            .field("state", &self.state)
            .field("nudge_visible", &self.nudges.is_visible())
            .field("dragging", &self.drag.is_dragging())
            .finish()
    }
}

impl TourStateMachine {
    /// Create a machine positioned on the first step.
    pub fn new(
        steps: StepRegistry,
        nudges: NudgeEscalator,
        sink: impl CompletionSink + 'static,
    ) -> Self {
        Self {
            steps,
            state: TourState::new(),
            nudges,
            drag: DragController::new(),
            sink: Box::new(sink),
            completion_delivered: false,
        }
    }

    pub fn steps(&self) -> &StepRegistry {
        &self.steps
    }

    pub fn state(&self) -> &TourState {
        &self.state
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    /// Active step.
    pub fn current_step(&self) -> &Step {
        self.steps.step(self.state.current_index())
    }

    pub fn phase(&self) -> TourPhase {
        self.state.phase()
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    pub fn visible_nudge(&self) -> Option<&VisibleNudge> {
        self.nudges.visible()
    }

    pub fn nudges_shown(&self) -> u64 {
        self.nudges.shown_count()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn next(&mut self) -> Option<TourEvent> {
        let t = self.state.next(&self.steps);
        self.commit(t)
    }

    pub fn back(&mut self) -> Option<TourEvent> {
        let t = self.state.back(&self.steps);
        self.commit(t)
    }

    pub fn skip(&mut self) -> Option<TourEvent> {
        let t = self.state.skip(&self.steps);
        self.commit(t)
    }

    pub fn jump_to(&mut self, index: usize) -> Option<TourEvent> {
        let t = self.state.jump_to(&self.steps, index);
        self.commit(t)
    }

    pub fn set_dont_show_again(&mut self, flag: bool) {
        self.state = self.state.with_dont_show_again(flag);
    }

    pub fn apply(&mut self, command: TourCommand) -> Option<TourEvent> {
        let t = self.state.apply(&self.steps, command);
        self.commit(t)
    }

    /// Record the gating interaction for a step. Returns `true` if the flag
    /// was newly set.
    pub fn mark_action_performed(&mut self, id: &StepId) -> bool {
        if self.state.action_performed(id) {
            return false;
        }
        self.state = self.state.with_action_performed(id);
        #[cfg(feature = "tracing")]
        tracing::debug!(step = %id, "action performed");
        true
    }

    /// Record the gating interaction for the active step.
    pub fn mark_current_action_performed(&mut self) -> bool {
        let id = self.current_step().id.clone();
        self.mark_action_performed(&id)
    }

    /// Store the latest measurement of the active target. Ignored once the
    /// tour is completed.
    pub fn set_target_rect(&mut self, rect: Option<Rect>) {
        if self.is_completed() {
            return;
        }
        self.state = self.state.with_target_rect(rect);
    }

    pub fn begin_drag(&mut self, origin: Point) {
        if self.is_completed() {
            return;
        }
        self.drag.begin_drag(origin);
    }

    pub fn update_drag(&mut self, pointer: Point) -> Option<Offset> {
        let offset = self.drag.update_drag(pointer)?;
        self.state = self.state.with_drag_offset(offset);
        Some(offset)
    }

    pub fn end_drag(&mut self, pointer: Point) -> Offset {
        let offset = self.drag.end_drag(pointer);
        self.state = self.state.with_drag_offset(offset);
        offset
    }

    /// Advance the nudge hide timer. Returns `true` when a nudge was hidden.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.nudges.tick(delta)
    }

    fn commit(&mut self, transition: Transition) -> Option<TourEvent> {
        let Transition { state, event } = transition;
        self.state = state;
        #[cfg(feature = "tracing")]
        trace_event(event.as_ref());
        match &event {
            Some(TourEvent::StepChanged { .. }) => {
                self.drag.reset();
                self.nudges.hide();
            }
            Some(TourEvent::NudgeShown { step, .. }) => {
                self.nudges.show(step);
            }
            Some(TourEvent::Completed {
                dont_show_again, ..
            }) => {
                self.drag.reset();
                self.nudges.hide();
                if !self.completion_delivered {
                    self.completion_delivered = true;
                    self.sink.complete(*dont_show_again);
                }
            }
            None => {}
        }
        event
    }
}

#[cfg(feature = "tracing")]
fn trace_event(event: Option<&TourEvent>) {
    match event {
        Some(TourEvent::StepChanged { from, to, reason }) => {
            tracing::debug!(from, to, reason = ?reason, "tour step changed");
        }
        Some(TourEvent::NudgeShown { step, nudge_count }) => {
            tracing::debug!(step = %step, nudge_count, "advance blocked");
        }
        Some(TourEvent::Completed {
            dont_show_again,
            reason,
        }) => {
            tracing::info!(dont_show_again, reason = ?reason, "tour completed");
        }
        None => {}
    }
}
