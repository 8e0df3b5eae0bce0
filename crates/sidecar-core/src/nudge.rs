#![forbid(unsafe_code)]

//! Nudge policy: one warning, then allow.
//!
//! When the user asks to advance from a targeted step without having
//! interacted with its target, the first attempt is blocked and a transient
//! warning is shown. Any later attempt on the same step escalates and
//! advances anyway. This is a soft requirement, never a hard gate.

use web_time::Duration;

use crate::step::{Step, StepId};
use crate::timer::Countdown;

/// Default time a nudge stays on screen.
pub const DEFAULT_NUDGE_DURATION: Duration = Duration::from_millis(2500);

/// Default nudge text.
pub const DEFAULT_NUDGE_MESSAGE: &str = "Try the highlighted control first, or press Next again to continue.";

/// What an advance request is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceDecision {
    /// Untargeted step, or the interaction already happened.
    Allow,
    /// First blocked attempt: warn and stay.
    Warn,
    /// A warning was already shown for this step: advance regardless.
    Escalate,
}

impl AdvanceDecision {
    /// Whether the request results in leaving the step.
    #[inline]
    pub fn advances(self) -> bool {
        !matches!(self, Self::Warn)
    }
}

/// Decide an advance request.
///
/// `prior_nudges` is the number of blocked attempts already recorded for the
/// active step.
pub fn decide(step: &Step, action_performed: bool, prior_nudges: u32) -> AdvanceDecision {
    if !step.is_targeted() || action_performed {
        AdvanceDecision::Allow
    } else if prior_nudges == 0 {
        AdvanceDecision::Warn
    } else {
        AdvanceDecision::Escalate
    }
}

/// A nudge currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleNudge {
    pub step: StepId,
    pub message: String,
    timer: Countdown,
}

impl VisibleNudge {
    /// Time until the nudge hides itself.
    pub fn remaining(&self) -> Duration {
        self.timer.remaining()
    }
}

/// Displays nudges and hides them after a fixed duration.
#[derive(Debug, Clone)]
pub struct NudgeEscalator {
    duration: Duration,
    message: String,
    visible: Option<VisibleNudge>,
    shown_count: u64,
}

impl Default for NudgeEscalator {
    fn default() -> Self {
        Self::new(DEFAULT_NUDGE_DURATION, DEFAULT_NUDGE_MESSAGE)
    }
}

impl NudgeEscalator {
    pub fn new(duration: Duration, message: impl Into<String>) -> Self {
        Self {
            duration,
            message: message.into(),
            visible: None,
            shown_count: 0,
        }
    }

    /// Show the warning for `step`, restarting the hide timer.
    pub fn show(&mut self, step: &StepId) {
        self.visible = Some(VisibleNudge {
            step: step.clone(),
            message: self.message.clone(),
            timer: Countdown::new(self.duration),
        });
        self.shown_count = self.shown_count.saturating_add(1);
        #[cfg(feature = "tracing")]
        tracing::debug!(step = %step, shown = self.shown_count, "nudge shown");
    }

    /// Advance the hide timer. Returns `true` on the tick that hides the nudge.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(nudge) = self.visible.as_mut() else {
            return false;
        };
        if nudge.timer.tick(delta) {
            self.visible = None;
            return true;
        }
        false
    }

    /// Hide immediately, e.g. on step change.
    pub fn hide(&mut self) {
        self.visible = None;
    }

    pub fn visible(&self) -> Option<&VisibleNudge> {
        self.visible.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.is_some()
    }

    /// Total number of nudges displayed over the escalator's lifetime.
    pub fn shown_count(&self) -> u64 {
        self.shown_count
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
