#![forbid(unsafe_code)]

//! Tour state record and its pure transition functions.
//!
//! [`TourState`] is a plain value. Every transition takes `&self` plus the
//! [`StepRegistry`] and returns a [`Transition`] holding the successor state
//! and the event it produced; the input is never mutated. The stateful
//! wrapper that owns side effects lives in [`crate::machine`].
//!
//! # Invariants
//!
//! 1. `current_index` always addresses a valid step of the registry it is
//!    used with (out-of-range requests are clamped).
//! 2. Every index change resets `drag_offset` to zero, `nudge_count` to zero
//!    and drops the stale `target_rect`.
//! 3. Entries in `action_performed` only ever go from `false` to `true`.
//! 4. `Completed` is terminal: every transition from it is a no-op.

use std::collections::HashMap;

use crate::geometry::{Offset, Rect};
use crate::nudge::{self, AdvanceDecision};
use crate::step::{StepId, StepRegistry};

/// Lifecycle phase of a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourPhase {
    #[default]
    Active,
    Completed,
}

/// Why the active step changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceReason {
    /// `next()` with the gate satisfied or absent.
    Next,
    /// `next()` after a nudge was already shown on the step.
    Escalated,
    Back,
    Jump,
}

/// Why the tour ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// Advanced past the last step.
    Finished,
    Skipped,
}

/// Observable outcome of a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum TourEvent {
    StepChanged {
        from: usize,
        to: usize,
        reason: AdvanceReason,
    },
    /// An advance was blocked and the user warned.
    NudgeShown { step: StepId, nudge_count: u32 },
    Completed {
        dont_show_again: bool,
        reason: CompletionReason,
    },
}

/// Host-facing commands, for mapping card controls or key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourCommand {
    Next,
    Back,
    Skip,
    JumpTo(usize),
    SetDontShowAgain(bool),
}

/// Successor state plus the event the transition produced, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: TourState,
    pub event: Option<TourEvent>,
}

impl Transition {
    fn unchanged(state: &TourState) -> Self {
        Self {
            state: state.clone(),
            event: None,
        }
    }
}

/// The complete mutable state of a tour.
#[derive(Debug, Clone, PartialEq)]
pub struct TourState {
    current_index: usize,
    target_rect: Option<Rect>,
    drag_offset: Offset,
    action_performed: HashMap<StepId, bool>,
    nudge_count: u32,
    dont_show_again: bool,
    phase: TourPhase,
}

impl Default for TourState {
    fn default() -> Self {
        Self::new()
    }
}

impl TourState {
    /// Initial state: first step, don't-show-again checked.
    pub fn new() -> Self {
        Self {
            current_index: 0,
            target_rect: None,
            drag_offset: Offset::ZERO,
            action_performed: HashMap::new(),
            nudge_count: 0,
            dont_show_again: true,
            phase: TourPhase::Active,
        }
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[inline]
    pub fn target_rect(&self) -> Option<Rect> {
        self.target_rect
    }

    #[inline]
    pub fn drag_offset(&self) -> Offset {
        self.drag_offset
    }

    #[inline]
    pub fn nudge_count(&self) -> u32 {
        self.nudge_count
    }

    #[inline]
    pub fn dont_show_again(&self) -> bool {
        self.dont_show_again
    }

    #[inline]
    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.phase == TourPhase::Completed
    }

    /// Whether the gating interaction was observed for `id`.
    pub fn action_performed(&self, id: &StepId) -> bool {
        self.action_performed.get(id).copied().unwrap_or(false)
    }

    /// Request to advance.
    ///
    /// Targeted steps without an observed interaction warn once, then
    /// escalate. Advancing from the last step completes the tour.
    pub fn next(&self, steps: &StepRegistry) -> Transition {
        if self.is_completed() {
            return Transition::unchanged(self);
        }
        let step = steps.step(self.current_index);
        let decision = nudge::decide(step, self.action_performed(&step.id), self.nudge_count);

        let mut state = self.clone();
        if decision != AdvanceDecision::Allow {
            state.nudge_count = state.nudge_count.saturating_add(1);
        }
        if decision == AdvanceDecision::Warn {
            let event = TourEvent::NudgeShown {
                step: step.id.clone(),
                nudge_count: state.nudge_count,
            };
            return Transition {
                state,
                event: Some(event),
            };
        }

        if self.current_index >= steps.last_index() {
            return state.complete(CompletionReason::Finished);
        }
        let reason = if decision == AdvanceDecision::Escalate {
            AdvanceReason::Escalated
        } else {
            AdvanceReason::Next
        };
        state.enter(self.current_index + 1, reason)
    }

    /// Step back. No-op on the first step.
    pub fn back(&self, _steps: &StepRegistry) -> Transition {
        if self.is_completed() || self.current_index == 0 {
            return Transition::unchanged(self);
        }
        self.clone().enter(self.current_index - 1, AdvanceReason::Back)
    }

    /// End the tour immediately, regardless of index or gating.
    pub fn skip(&self, _steps: &StepRegistry) -> Transition {
        if self.is_completed() {
            return Transition::unchanged(self);
        }
        self.clone().complete(CompletionReason::Skipped)
    }

    /// Move directly to `index`, clamped into range.
    pub fn jump_to(&self, steps: &StepRegistry, index: usize) -> Transition {
        if self.is_completed() {
            return Transition::unchanged(self);
        }
        let index = steps.clamp_index(index);
        if index == self.current_index {
            return Transition::unchanged(self);
        }
        self.clone().enter(index, AdvanceReason::Jump)
    }

    /// Dispatch a [`TourCommand`].
    pub fn apply(&self, steps: &StepRegistry, command: TourCommand) -> Transition {
        match command {
            TourCommand::Next => self.next(steps),
            TourCommand::Back => self.back(steps),
            TourCommand::Skip => self.skip(steps),
            TourCommand::JumpTo(index) => self.jump_to(steps, index),
            TourCommand::SetDontShowAgain(flag) => Transition {
                state: self.with_dont_show_again(flag),
                event: None,
            },
        }
    }

    /// Pure flag update; never a transition.
    #[must_use]
    pub fn with_dont_show_again(&self, flag: bool) -> Self {
        let mut state = self.clone();
        state.dont_show_again = flag;
        state
    }

    /// Record the gating interaction for `id`. Monotonic.
    #[must_use]
    pub fn with_action_performed(&self, id: &StepId) -> Self {
        let mut state = self.clone();
        state.action_performed.insert(id.clone(), true);
        state
    }

    /// Store the latest measurement of the active target.
    #[must_use]
    pub fn with_target_rect(&self, rect: Option<Rect>) -> Self {
        let mut state = self.clone();
        state.target_rect = rect;
        state
    }

    #[must_use]
    pub fn with_drag_offset(&self, offset: Offset) -> Self {
        let mut state = self.clone();
        state.drag_offset = offset;
        state
    }

    fn enter(mut self, index: usize, reason: AdvanceReason) -> Transition {
        let from = self.current_index;
        self.current_index = index;
        self.drag_offset = Offset::ZERO;
        self.nudge_count = 0;
        self.target_rect = None;
        Transition {
            state: self,
            event: Some(TourEvent::StepChanged {
                from,
                to: index,
                reason,
            }),
        }
    }

    fn complete(mut self, reason: CompletionReason) -> Transition {
        self.phase = TourPhase::Completed;
        self.drag_offset = Offset::ZERO;
        self.nudge_count = 0;
        self.target_rect = None;
        let event = TourEvent::Completed {
            dont_show_again: self.dont_show_again,
            reason,
        };
        Transition {
            state: self,
            event: Some(event),
        }
    }
}
