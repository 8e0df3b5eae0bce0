#![forbid(unsafe_code)]

//! Live target tracking for the active step.
//!
//! # State Machine
//!
//! Each activated step gets a fresh [`StepScope`]:
//!
//! - **Untargeted**: the step has no target. Nothing is subscribed.
//! - **Searching**: the target is not on the page. The scope polls on the
//!   re-measure interval so content that renders late is still picked up.
//! - **Settling**: the target was found and scrolled into view; the first
//!   measurement waits for the settle delay.
//! - **Tracking**: the target is re-measured on every poll and whenever the
//!   layout source reports a resize or scroll.
//!
//! # Invariants
//!
//! 1. At most one scope exists. Activating a step tears down the previous
//!    scope (layout subscription, interaction listener, timers) before the
//!    new one is created, so nothing from an old step can fire afterwards.
//! 2. `ActionPerformed` is reported at most once per scope.
//! 3. Measurements are only reported when they change; a target that
//!    disappears is reported `Lost` once.
//!
//! # Failure Modes
//!
//! - A target that vanishes mid-step, or measures as a degenerate rectangle,
//!   produces `Lost` and the scope goes back to searching. It is never an
//!   error.

use sidecar_core::config::TrackerConfig;
use sidecar_core::geometry::Rect;
use sidecar_core::step::{Step, StepId, TargetId};
use sidecar_core::timer::{Countdown, Interval};
use web_time::Duration;

use crate::host::{SubId, TourHost};

/// What the tracker observed during an activation or tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerEvent {
    /// New measurement of the active target.
    Measured(Rect),
    /// The active step has no usable target right now; use centered layout.
    Lost,
    /// First qualifying interaction on the active target.
    ActionPerformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPhase {
    Untargeted,
    Searching,
    Settling,
    Tracking,
}

#[derive(Debug)]
enum Phase {
    Untargeted,
    Searching(Interval),
    Settling(Countdown),
    Tracking(Interval),
}

impl Phase {
    fn kind(&self) -> TrackingPhase {
        match self {
            Self::Untargeted => TrackingPhase::Untargeted,
            Self::Searching(_) => TrackingPhase::Searching,
            Self::Settling(_) => TrackingPhase::Settling,
            Self::Tracking(_) => TrackingPhase::Tracking,
        }
    }
}

#[derive(Debug)]
struct Subscriptions {
    layout: SubId,
    interactions: SubId,
}

/// Timers, subscriptions and the last measurement for one step.
#[derive(Debug)]
struct StepScope {
    step: StepId,
    target: Option<TargetId>,
    subs: Option<Subscriptions>,
    phase: Phase,
    last: Option<Rect>,
    lost_reported: bool,
    action_reported: bool,
}

/// Resolves and continuously measures the active step's target.
#[derive(Debug)]
pub struct TargetTracker {
    config: TrackerConfig,
    scope: Option<StepScope>,
    activations: u64,
}

impl Default for TargetTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl TargetTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            scope: None,
            activations: 0,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Step the current scope belongs to.
    pub fn active_step(&self) -> Option<&StepId> {
        self.scope.as_ref().map(|scope| &scope.step)
    }

    pub fn phase(&self) -> Option<TrackingPhase> {
        self.scope.as_ref().map(|scope| scope.phase.kind())
    }

    /// Last reported measurement.
    pub fn current(&self) -> Option<Rect> {
        self.scope.as_ref().and_then(|scope| scope.last)
    }

    /// Number of scopes created over the tracker's lifetime.
    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Start tracking `step`, tearing down whatever scope was active.
    pub fn activate<H: TourHost + ?Sized>(&mut self, host: &mut H, step: &Step) -> Vec<TrackerEvent> {
        self.teardown(host);
        self.activations = self.activations.saturating_add(1);

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "tracker_activate",
            step = %step.id,
            target_id = step.target.as_ref().map(TargetId::as_str).unwrap_or("")
        )
        .entered();

        let Some(target) = step.target.clone() else {
            self.scope = Some(StepScope {
                step: step.id.clone(),
                target: None,
                subs: None,
                phase: Phase::Untargeted,
                last: None,
                lost_reported: true,
                action_reported: false,
            });
            return vec![TrackerEvent::Lost];
        };

        let subs = Subscriptions {
            layout: host.subscribe_layout(),
            interactions: host.attach_interactions(&target),
        };
        let mut scope = StepScope {
            step: step.id.clone(),
            target: Some(target.clone()),
            subs: Some(subs),
            phase: Phase::Searching(Interval::new(self.config.poll_interval())),
            last: None,
            lost_reported: false,
            action_reported: false,
        };

        let mut events = Vec::new();
        if locate_measurable(host, &target).is_some() {
            host.scroll_into_center(&target);
            scope.phase = Phase::Settling(Countdown::new(self.config.settle_delay()));
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(target_id = %target, "target not on page; searching");
            scope.lost_reported = true;
            events.push(TrackerEvent::Lost);
        }
        self.scope = Some(scope);
        events
    }

    /// Drain only the pending interactions on the active target.
    ///
    /// Hosts may deliver a click and an advance request between two ticks;
    /// calling this before the advance lets the click count. Returns
    /// `ActionPerformed` at most once per scope.
    pub fn poll_interactions<H: TourHost + ?Sized>(&mut self, host: &mut H) -> Option<TrackerEvent> {
        let scope = self.scope.as_mut()?;
        let subs = scope.subs.as_ref()?;
        let interactions = host.drain_interactions(subs.interactions);
        if scope.action_reported || !interactions.iter().any(|kind| kind.is_primary_action()) {
            return None;
        }
        scope.action_reported = true;
        #[cfg(feature = "tracing")]
        tracing::debug!(step = %scope.step, "gating interaction observed");
        Some(TrackerEvent::ActionPerformed)
    }

    /// Advance timers and process pending notifications.
    pub fn tick<H: TourHost + ?Sized>(&mut self, host: &mut H, delta: Duration) -> Vec<TrackerEvent> {
        let settle_delay = self.config.settle_delay();
        let poll_interval = self.config.poll_interval();
        let mut events: Vec<TrackerEvent> = self.poll_interactions(host).into_iter().collect();

        let Some(scope) = self.scope.as_mut() else {
            return events;
        };
        let (Some(target), Some(subs)) = (scope.target.clone(), scope.subs.as_ref()) else {
            return events;
        };
        let layout_sub = subs.layout;

        let layout_changed = !host.drain_layout_changes(layout_sub).is_empty();

        let measure = match &mut scope.phase {
            Phase::Untargeted => false,
            Phase::Searching(interval) => {
                if interval.tick(delta) > 0 && locate_measurable(host, &target).is_some() {
                    host.scroll_into_center(&target);
                    scope.phase = Phase::Settling(Countdown::new(settle_delay));
                }
                false
            }
            Phase::Settling(countdown) => {
                if countdown.tick(delta) {
                    scope.phase = Phase::Tracking(Interval::new(poll_interval));
                    true
                } else {
                    false
                }
            }
            Phase::Tracking(interval) => interval.tick(delta) > 0 || layout_changed,
        };

        if measure {
            match locate_measurable(host, &target) {
                Some(rect) => {
                    scope.lost_reported = false;
                    if scope.last != Some(rect) {
                        scope.last = Some(rect);
                        #[cfg(feature = "tracing")]
                        tracing::trace!(
                            target_id = %target,
                            left = rect.left,
                            top = rect.top,
                            width = rect.width,
                            height = rect.height,
                            "target measured"
                        );
                        events.push(TrackerEvent::Measured(rect));
                    }
                }
                None => {
                    scope.last = None;
                    scope.phase = Phase::Searching(Interval::new(poll_interval));
                    if !scope.lost_reported {
                        scope.lost_reported = true;
                        #[cfg(feature = "tracing")]
                        tracing::debug!(target_id = %target, "target lost");
                        events.push(TrackerEvent::Lost);
                    }
                }
            }
        }

        events
    }

    /// Drop the active scope and release its host subscriptions.
    pub fn teardown<H: TourHost + ?Sized>(&mut self, host: &mut H) {
        let Some(scope) = self.scope.take() else {
            return;
        };
        if let Some(subs) = scope.subs {
            host.unsubscribe_layout(subs.layout);
            host.detach_interactions(subs.interactions);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                step = %scope.step,
                layout_sub = subs.layout,
                interaction_sub = subs.interactions,
                "tracker scope torn down"
            );
        }
    }
}

fn locate_measurable<H: TourHost + ?Sized>(host: &H, target: &TargetId) -> Option<Rect> {
    host.locate(target).filter(Rect::is_measurable)
}
