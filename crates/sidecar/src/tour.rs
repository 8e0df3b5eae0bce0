#![forbid(unsafe_code)]

//! The mounted tour.
//!
//! [`Tour`] owns the host page handle and wires the pieces together:
//!
//! ```text
//!   commands / pointer ──► TourStateMachine ──StepChanged──► TargetTracker::activate
//!                              ▲                                   │
//!                              │ set_target_rect / action flag     │ tick
//!                              └────────── TrackerEvent ◄──────────┘
//!
//!   render(viewport) ──► OverlayRenderer ──► OverlayLayer
//! ```
//!
//! # Lifecycle
//!
//! Construction mounts the tour and starts tracking step 0. Completion (via
//! Next on the last step or Skip) and [`Tour::unmount`] both tear the
//! tracker down, releasing every host subscription. Dropping a tour unmounts
//! it. An unmounted tour ignores every operation and renders nothing.

use std::fmt;

use sidecar_core::config::TourConfig;
use sidecar_core::geometry::{Offset, Point};
use sidecar_core::machine::{CompletionSink, TourStateMachine};
use sidecar_core::state::{TourCommand, TourEvent, TourState};
use sidecar_core::step::{Step, StepRegistry};
use sidecar_layout::{PositionEngine, Viewport};
use sidecar_render::{ControlKind, Hit, OverlayLayer, OverlayRenderer};
use sidecar_tracker::{TargetTracker, TourHost, TrackerEvent};
use web_time::Duration;

use crate::error::{Error, Result};

/// Pointer input routed to the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
}

/// What the overlay did with a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerResponse {
    /// Not over the card; deliver the event to the page.
    PassThrough,
    /// Handled by the overlay, possibly producing a tour event.
    Consumed(Option<TourEvent>),
}

impl PointerResponse {
    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed(_))
    }
}

/// A mounted product tour over host page `H`.
pub struct Tour<H: TourHost> {
    host: H,
    machine: TourStateMachine,
    tracker: TargetTracker,
    renderer: OverlayRenderer,
    mounted: bool,
}

impl<H: TourHost + fmt::Debug> fmt::Debug for Tour<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tour")
            .field("host", &self.host)
            .field("machine", &self.machine)
            .field("tracker", &self.tracker)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl<H: TourHost> Tour<H> {
    /// Mount a tour with the default configuration.
    pub fn new(host: H, steps: StepRegistry, sink: impl CompletionSink + 'static) -> Self {
        Self::build(host, steps, &TourConfig::default(), sink)
    }

    /// Mount a tour with an explicit configuration.
    pub fn with_config(
        host: H,
        steps: StepRegistry,
        config: &TourConfig,
        sink: impl CompletionSink + 'static,
    ) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(Error::InvalidConfig(errors));
        }
        Ok(Self::build(host, steps, config, sink))
    }

    /// Mount a tour whose script is authored as JSON.
    #[cfg(feature = "config")]
    pub fn from_json_script(
        host: H,
        script: &str,
        config: &TourConfig,
        sink: impl CompletionSink + 'static,
    ) -> Result<Self> {
        let steps = StepRegistry::from_json_str(script)?;
        Self::with_config(host, steps, config, sink)
    }

    fn build(
        host: H,
        steps: StepRegistry,
        config: &TourConfig,
        sink: impl CompletionSink + 'static,
    ) -> Self {
        let machine = TourStateMachine::new(steps, config.nudge.escalator(), sink);
        let mut tour = Self {
            host,
            machine,
            tracker: TargetTracker::new(config.tracker.clone()),
            renderer: OverlayRenderer::new(PositionEngine::new(config.layout.clone())),
            mounted: true,
        };
        #[cfg(feature = "tracing")]
        tracing::info!(steps = tour.machine.steps().len(), "tour mounted");
        tour.activate_current();
        tour
    }

    /// Replace the renderer, e.g. to apply a theme.
    #[must_use]
    pub fn with_renderer(mut self, renderer: OverlayRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host page, for hosts that deliver their own
    /// events between ticks.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn machine(&self) -> &TourStateMachine {
        &self.machine
    }

    pub fn state(&self) -> &TourState {
        self.machine.state()
    }

    pub fn tracker(&self) -> &TargetTracker {
        &self.tracker
    }

    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    pub fn current_index(&self) -> usize {
        self.machine.current_index()
    }

    pub fn current_step(&self) -> &Step {
        self.machine.current_step()
    }

    pub fn is_completed(&self) -> bool {
        self.machine.is_completed()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn next(&mut self) -> Option<TourEvent> {
        self.apply(TourCommand::Next)
    }

    pub fn back(&mut self) -> Option<TourEvent> {
        self.apply(TourCommand::Back)
    }

    pub fn skip(&mut self) -> Option<TourEvent> {
        self.apply(TourCommand::Skip)
    }

    pub fn jump_to(&mut self, index: usize) -> Option<TourEvent> {
        self.apply(TourCommand::JumpTo(index))
    }

    pub fn set_dont_show_again(&mut self, flag: bool) {
        if self.mounted {
            self.machine.set_dont_show_again(flag);
        }
    }

    /// Dispatch a command and follow up on the resulting event.
    pub fn apply(&mut self, command: TourCommand) -> Option<TourEvent> {
        if !self.mounted {
            return None;
        }
        if command == TourCommand::Next {
            // an interaction since the last tick still unlocks this advance
            let pending = self.tracker.poll_interactions(&mut self.host);
            self.apply_tracker_events(pending.into_iter().collect());
        }
        let event = self.machine.apply(command);
        match &event {
            Some(TourEvent::StepChanged { .. }) => self.activate_current(),
            Some(TourEvent::Completed { .. }) => {
                self.tracker.teardown(&mut self.host);
                #[cfg(feature = "tracing")]
                tracing::debug!("tracker released on completion");
            }
            Some(TourEvent::NudgeShown { .. }) | None => {}
        }
        event
    }

    pub fn begin_drag(&mut self, origin: Point) {
        if self.mounted {
            self.machine.begin_drag(origin);
        }
    }

    pub fn update_drag(&mut self, pointer: Point) -> Option<Offset> {
        if !self.mounted {
            return None;
        }
        self.machine.update_drag(pointer)
    }

    pub fn end_drag(&mut self, pointer: Point) -> Offset {
        if !self.mounted {
            return Offset::ZERO;
        }
        self.machine.end_drag(pointer)
    }

    /// Advance every timer by `delta` and fold tracker observations into the
    /// state. Returns `true` when the overlay needs repainting.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.mounted || self.machine.is_completed() {
            return false;
        }
        let nudge_hidden = self.machine.tick(delta);
        let events = self.tracker.tick(&mut self.host, delta);
        let tracked = self.apply_tracker_events(events);
        nudge_hidden || tracked
    }

    /// Render the overlay for `viewport`. `None` once completed or unmounted.
    pub fn render(&self, viewport: &Viewport) -> Option<OverlayLayer> {
        if !self.mounted {
            return None;
        }
        self.renderer.render(&self.machine, viewport)
    }

    /// Route pointer input: controls dispatch commands, the rest of the card
    /// drags, everything else passes through to the page.
    pub fn handle_pointer(&mut self, viewport: &Viewport, event: PointerEvent) -> PointerResponse {
        match event {
            PointerEvent::Down(point) => {
                let Some(hit) = self.render(viewport).and_then(|layer| layer.hit_test(point))
                else {
                    return PointerResponse::PassThrough;
                };
                let tour_event = match hit {
                    Hit::Control(ControlKind::Back) => self.back(),
                    Hit::Control(ControlKind::Next) => self.next(),
                    Hit::Control(ControlKind::Skip) => self.skip(),
                    Hit::Control(ControlKind::DontShowAgain) => {
                        let flag = !self.machine.state().dont_show_again();
                        self.set_dont_show_again(flag);
                        None
                    }
                    Hit::Card => {
                        self.begin_drag(point);
                        None
                    }
                };
                PointerResponse::Consumed(tour_event)
            }
            PointerEvent::Move(point) => {
                if !self.machine.is_dragging() {
                    return PointerResponse::PassThrough;
                }
                self.update_drag(point);
                PointerResponse::Consumed(None)
            }
            PointerEvent::Up(point) => {
                if !self.machine.is_dragging() {
                    return PointerResponse::PassThrough;
                }
                self.end_drag(point);
                PointerResponse::Consumed(None)
            }
        }
    }

    /// Tear the overlay down without completing the tour. The completion
    /// sink is not called. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.tracker.teardown(&mut self.host);
        self.mounted = false;
        #[cfg(feature = "tracing")]
        tracing::info!(
            completed = self.machine.is_completed(),
            index = self.machine.current_index(),
            "tour unmounted"
        );
    }

    fn activate_current(&mut self) {
        let step = self.machine.current_step().clone();
        let events = self.tracker.activate(&mut self.host, &step);
        self.apply_tracker_events(events);
    }

    fn apply_tracker_events(&mut self, events: Vec<TrackerEvent>) -> bool {
        let mut changed = false;
        for event in events {
            match event {
                TrackerEvent::Measured(rect) => {
                    self.machine.set_target_rect(Some(rect));
                    changed = true;
                }
                TrackerEvent::Lost => {
                    changed |= self.machine.state().target_rect().is_some();
                    self.machine.set_target_rect(None);
                }
                TrackerEvent::ActionPerformed => {
                    let Some(step) = self.tracker.active_step().cloned() else {
                        continue;
                    };
                    if step == self.machine.current_step().id {
                        self.machine.mark_action_performed(&step);
                    }
                }
            }
        }
        changed
    }
}

impl<H: TourHost> Drop for Tour<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
