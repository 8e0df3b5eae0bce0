#![forbid(unsafe_code)]

//! Turns tour state into an [`OverlayLayer`].
//!
//! Paint order, back to front:
//!
//! 1. scrim over the whole viewport, with a cutout over the ring
//! 2. highlight ring (measured target only)
//! 3. connector (measured target only)
//! 4. card
//!
//! A completed tour renders nothing. A targeted step whose target is not
//! currently measured degrades to the centered card without ring or
//! connector.

use sidecar_core::geometry::Rect;
use sidecar_core::machine::TourStateMachine;
use sidecar_core::nudge::VisibleNudge;
use sidecar_core::state::TourState;
use sidecar_core::step::StepRegistry;
use sidecar_layout::{OverlayGeometry, PositionEngine, Viewport};

use crate::layer::{
    CardView, Control, ControlKind, DrawOp, OVERLAY_Z_INDEX, OverlayLayer, Progress,
};
use crate::theme::OverlayTheme;

/// Placement of the controls inside the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardMetrics {
    pub padding: f64,
    pub button_width: f64,
    pub button_height: f64,
    pub button_gap: f64,
    pub checkbox_height: f64,
}

impl Default for CardMetrics {
    fn default() -> Self {
        Self {
            padding: 16.0,
            button_width: 76.0,
            button_height: 32.0,
            button_gap: 8.0,
            checkbox_height: 20.0,
        }
    }
}

impl CardMetrics {
    fn button_row_top(&self, card: &Rect) -> f64 {
        card.bottom() - self.padding - self.button_height
    }

    fn button(&self, left: f64, card: &Rect) -> Rect {
        Rect::new(
            left,
            self.button_row_top(card),
            self.button_width,
            self.button_height,
        )
    }

    pub fn back(&self, card: &Rect) -> Rect {
        self.button(card.left + self.padding, card)
    }

    pub fn next(&self, card: &Rect) -> Rect {
        self.button(card.right() - self.padding - self.button_width, card)
    }

    pub fn skip(&self, card: &Rect) -> Rect {
        let next = self.next(card);
        self.button(next.left - self.button_gap - self.button_width, card)
    }

    pub fn checkbox(&self, card: &Rect) -> Rect {
        Rect::new(
            card.left + self.padding,
            self.button_row_top(card) - self.button_gap - self.checkbox_height,
            (card.width - self.padding * 2.0).max(0.0),
            self.checkbox_height,
        )
    }
}

/// Paints the ring, connector and card for the active step.
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    engine: PositionEngine,
    theme: OverlayTheme,
    metrics: CardMetrics,
}

impl OverlayRenderer {
    pub fn new(engine: PositionEngine) -> Self {
        Self {
            engine,
            theme: OverlayTheme::default(),
            metrics: CardMetrics::default(),
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: OverlayTheme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: CardMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn engine(&self) -> &PositionEngine {
        &self.engine
    }

    pub fn theme(&self) -> &OverlayTheme {
        &self.theme
    }

    pub fn metrics(&self) -> &CardMetrics {
        &self.metrics
    }

    /// Render the machine's current state. `None` once the tour completed.
    pub fn render(&self, machine: &TourStateMachine, viewport: &Viewport) -> Option<OverlayLayer> {
        self.render_state(
            machine.steps(),
            machine.state(),
            machine.visible_nudge(),
            viewport,
        )
    }

    /// Render an explicit state record.
    pub fn render_state(
        &self,
        steps: &StepRegistry,
        state: &TourState,
        nudge: Option<&VisibleNudge>,
        viewport: &Viewport,
    ) -> Option<OverlayLayer> {
        if state.is_completed() {
            return None;
        }
        let index = steps.clamp_index(state.current_index());
        let step = steps.step(index);
        let target = if step.is_targeted() {
            state.target_rect()
        } else {
            None
        };
        let geometry = self
            .engine
            .layout(viewport, target.as_ref(), state.drag_offset());

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "overlay_render",
            step = %step.id,
            centered = geometry.is_centered()
        )
        .entered();

        let mut ops = Vec::with_capacity(4);
        ops.push(self.scrim(&geometry));
        if let Some(ring) = geometry.ring {
            ops.push(DrawOp::Ring {
                rect: ring,
                radius: self.engine.config().ring_radius,
                color: self.theme.ring,
                width: self.theme.ring_width,
            });
        }
        if let Some(connector) = geometry.connector {
            ops.push(DrawOp::Connector {
                curve: connector.curve,
                arrow: connector.arrow,
                color: self.theme.connector,
                width: self.theme.connector_width,
            });
        }

        let progress = Progress {
            index,
            count: steps.len(),
        };
        let nudge = nudge
            .filter(|visible| visible.step == step.id)
            .map(|visible| visible.message.clone());
        let card = geometry.card;
        ops.push(DrawOp::Card(CardView {
            rect: card,
            step: step.id.clone(),
            headline: step.headline.clone(),
            body: step.body.clone(),
            action_hint: step.action_hint.clone(),
            progress,
            nudge,
            controls: self.controls(&card, progress, state.dont_show_again()),
            background: self.theme.card_background,
            border: self.theme.card_border,
            text: self.theme.text,
            muted_text: self.theme.muted_text,
            accent: self.theme.accent,
            nudge_color: self.theme.nudge,
        }));

        #[cfg(feature = "tracing")]
        tracing::trace!(ops = ops.len(), "overlay rendered");

        Some(OverlayLayer {
            z_index: OVERLAY_Z_INDEX,
            viewport: *viewport,
            ops,
        })
    }

    fn scrim(&self, geometry: &OverlayGeometry) -> DrawOp {
        DrawOp::Scrim {
            bounds: geometry.viewport.bounds(),
            cutout: geometry.ring,
            color: self
                .theme
                .scrim
                .with_opacity(self.engine.config().scrim_opacity),
        }
    }

    fn controls(&self, card: &Rect, progress: Progress, dont_show_again: bool) -> Vec<Control> {
        let next_label = if progress.is_last() { "Done" } else { "Next" };
        vec![
            Control {
                kind: ControlKind::DontShowAgain,
                label: "Don't show this again".to_string(),
                rect: self.metrics.checkbox(card),
                enabled: true,
                checked: Some(dont_show_again),
            },
            Control {
                kind: ControlKind::Back,
                label: "Back".to_string(),
                rect: self.metrics.back(card),
                enabled: progress.index > 0,
                checked: None,
            },
            Control {
                kind: ControlKind::Skip,
                label: "Skip".to_string(),
                rect: self.metrics.skip(card),
                enabled: true,
                checked: None,
            },
            Control {
                kind: ControlKind::Next,
                label: next_label.to_string(),
                rect: self.metrics.next(card),
                enabled: true,
                checked: None,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use sidecar_core::geometry::{Offset, Point};
    use sidecar_core::step::Step;
    use sidecar_core::{LayoutConfig, TourCommand};

    use super::*;
    use crate::layer::Hit;

    fn steps() -> StepRegistry {
        StepRegistry::new(vec![
            Step::new("intro", "Hello", "Welcome aboard."),
            Step::new("panel", "Panel", "This is the panel.")
                .target("panel")
                .action_hint("Click the panel"),
        ])
        .unwrap()
    }

    fn viewport() -> Viewport {
        Viewport::new(1400.0, 900.0).with_side_region(1000.0)
    }

    fn renderer() -> OverlayRenderer {
        OverlayRenderer::new(PositionEngine::new(LayoutConfig::default()))
    }

    #[test]
    fn centered_step_has_scrim_and_card_only() {
        let layer = renderer()
            .render_state(&steps(), &TourState::new(), None, &viewport())
            .unwrap();
        assert_eq!(layer.z_index, OVERLAY_Z_INDEX);
        assert_eq!(layer.ops.len(), 2);
        assert!(matches!(layer.ops[0], DrawOp::Scrim { cutout: None, .. }));
        assert!(!layer.has_ring());
        let card = layer.card().unwrap();
        assert_eq!(card.headline, "Hello");
        assert_eq!(card.progress.label(), "1 of 2");
        assert!(!card.control(ControlKind::Back).unwrap().enabled);
    }

    #[test]
    fn measured_target_adds_ring_and_connector() {
        let target = Rect::new(1040.0, 400.0, 200.0, 60.0);
        let state = TourState::new()
            .apply(&steps(), TourCommand::Next)
            .state
            .with_target_rect(Some(target));
        let layer = renderer()
            .render_state(&steps(), &state, None, &viewport())
            .unwrap();
        assert_eq!(layer.ops.len(), 4);
        assert!(layer.has_ring());
        assert!(layer.has_connector());
        let DrawOp::Scrim { cutout, .. } = &layer.ops[0] else {
            panic!("scrim must be painted first");
        };
        assert_eq!(*cutout, Some(target.inflate(6.0)));
        let card = layer.card().unwrap();
        assert_eq!(card.control(ControlKind::Next).unwrap().label, "Done");
        assert!(card.control(ControlKind::Back).unwrap().enabled);
        assert_eq!(card.action_hint.as_deref(), Some("Click the panel"));
    }

    #[test]
    fn unmeasured_target_degrades_to_centered() {
        let state = TourState::new().apply(&steps(), TourCommand::Next).state;
        let layer = renderer()
            .render_state(&steps(), &state, None, &viewport())
            .unwrap();
        assert!(!layer.has_ring());
        assert!(!layer.has_connector());
        let centered = renderer().engine().centered_anchor(&viewport());
        assert_eq!(layer.card().unwrap().rect.left, centered.left);
    }

    #[test]
    fn completed_tour_renders_nothing() {
        let state = TourState::new().apply(&steps(), TourCommand::Skip).state;
        assert!(
            renderer()
                .render_state(&steps(), &state, None, &viewport())
                .is_none()
        );
    }

    #[test]
    fn drag_offset_moves_card() {
        let state = TourState::new().with_drag_offset(Offset::new(12.0, -8.0));
        let dragged = renderer()
            .render_state(&steps(), &state, None, &viewport())
            .unwrap();
        let still = renderer()
            .render_state(&steps(), &TourState::new(), None, &viewport())
            .unwrap();
        let (a, b) = (dragged.card().unwrap().rect, still.card().unwrap().rect);
        assert_eq!(a.left - b.left, 12.0);
        assert_eq!(a.top - b.top, -8.0);
    }

    #[test]
    fn controls_fit_inside_card_and_hit_test() {
        let layer = renderer()
            .render_state(&steps(), &TourState::new(), None, &viewport())
            .unwrap();
        let card = layer.card().unwrap();
        for control in &card.controls {
            assert!(control.rect.left >= card.rect.left);
            assert!(control.rect.right() <= card.rect.right());
            assert!(control.rect.bottom() <= card.rect.bottom());
        }
        let next = card.control(ControlKind::Next).unwrap().rect.center();
        assert_eq!(layer.hit_test(next), Some(Hit::Control(ControlKind::Next)));
        let back = card.control(ControlKind::Back).unwrap().rect.center();
        assert_eq!(layer.hit_test(back), Some(Hit::Card), "disabled back");
        assert_eq!(
            layer.hit_test(Point::new(card.rect.left + 4.0, card.rect.top + 4.0)),
            Some(Hit::Card)
        );
        assert_eq!(layer.hit_test(Point::new(2.0, 2.0)), None, "scrim passes through");
    }
}
