#![forbid(unsafe_code)]

//! The overlay display list.
//!
//! An [`OverlayLayer`] is what one render pass produces: an ordered list of
//! [`DrawOp`]s painted back to front, mounted at [`OVERLAY_Z_INDEX`] outside
//! the host's layout tree. Hosts either paint the ops with their own
//! primitives or serialize them with [`crate::SvgExporter`].
//!
//! Only the card takes pointer input. The scrim, ring and connector let
//! every event through to the page underneath, so [`OverlayLayer::hit_test`]
//! returns `None` anywhere outside the card.

use sidecar_core::geometry::{Point, Rect};
use sidecar_core::step::StepId;
use sidecar_layout::{Arrowhead, CubicBezier, Viewport};

use crate::theme::Rgba;

/// Stacking order of the overlay relative to page content.
pub const OVERLAY_Z_INDEX: i32 = 10_000;

/// Card controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Back,
    Next,
    Skip,
    DontShowAgain,
}

impl ControlKind {
    /// Lowercase name used in exported markup.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Next => "next",
            Self::Skip => "skip",
            Self::DontShowAgain => "dont-show-again",
        }
    }
}

/// A button or checkbox on the card.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub kind: ControlKind,
    pub label: String,
    pub rect: Rect,
    pub enabled: bool,
    /// Checkbox state; `None` for buttons.
    pub checked: Option<bool>,
}

/// "Step 2 of 5".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based index of the active step.
    pub index: usize,
    pub count: usize,
}

impl Progress {
    pub fn label(&self) -> String {
        format!("{} of {}", self.index + 1, self.count)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.count
    }
}

/// Everything painted inside the card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub rect: Rect,
    pub step: StepId,
    pub headline: String,
    pub body: String,
    pub action_hint: Option<String>,
    pub progress: Progress,
    /// Visible nudge message, if any.
    pub nudge: Option<String>,
    pub controls: Vec<Control>,
    pub background: Rgba,
    pub border: Rgba,
    pub text: Rgba,
    pub muted_text: Rgba,
    pub accent: Rgba,
    pub nudge_color: Rgba,
}

impl CardView {
    pub fn control(&self, kind: ControlKind) -> Option<&Control> {
        self.controls.iter().find(|control| control.kind == kind)
    }
}

/// One paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Dimmed full-viewport backdrop with an optional spotlight cutout.
    Scrim {
        bounds: Rect,
        cutout: Option<Rect>,
        color: Rgba,
    },
    /// Highlight ring around the target.
    Ring {
        rect: Rect,
        radius: f64,
        color: Rgba,
        width: f64,
    },
    /// Curve from card to target with an arrowhead at the target end.
    Connector {
        curve: CubicBezier,
        arrow: Arrowhead,
        color: Rgba,
        width: f64,
    },
    Card(CardView),
}

impl DrawOp {
    /// Whether the op takes pointer input.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Card(_))
    }
}

/// Result of a pointer hit test on the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// An enabled control.
    Control(ControlKind),
    /// Anywhere else on the card; starts a drag.
    Card,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub z_index: i32,
    pub viewport: Viewport,
    /// Back to front.
    pub ops: Vec<DrawOp>,
}

impl OverlayLayer {
    pub fn card(&self) -> Option<&CardView> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Card(card) => Some(card),
            _ => None,
        })
    }

    pub fn has_ring(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Ring { .. }))
    }

    pub fn has_connector(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Connector { .. }))
    }

    /// Topmost interactive element under `point`, or `None` if the pointer
    /// passes through to the page.
    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Card(card) if card.rect.contains(point) => Some(
                card.controls
                    .iter()
                    .find(|control| control.enabled && control.rect.contains(point))
                    .map_or(Hit::Card, |control| Hit::Control(control.kind)),
            ),
            _ => None,
        })
    }
}
