#![forbid(unsafe_code)]

//! Card placement and connector geometry.
//!
//! The page reserves a side region on the right (the panel the tour talks
//! about). The card sits to the left of it:
//!
//! ```text
//!  viewport                                   side region
//! +-------------------------------------------+-----------+
//! |                                           |           |
//! |   +--------+  gap                         | [target]  |
//! |   |  card  |-------- connector ---------->|           |
//! |   +--------+                              |           |
//! +-------------------------------------------+-----------+
//! ```
//!
//! Centered steps put the card midway between the viewport's left edge and
//! the side region. Targeted steps pin the card's right edge `card_gap` left
//! of the side region and align its vertical center with the target. In both
//! cases the left edge never comes closer than `min_margin` to the viewport
//! edge.

use sidecar_core::config::LayoutConfig;
use sidecar_core::geometry::{Offset, Point, Rect, Size};

use crate::bezier::{Arrowhead, CubicBezier};

/// Visible area and the reserved side region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Left edge of the reserved side region. `None` means no side region,
    /// which behaves like one starting at the right edge.
    pub side_region_left: Option<f64>,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            side_region_left: None,
        }
    }

    #[must_use]
    pub const fn with_side_region(mut self, left: f64) -> Self {
        self.side_region_left = Some(left);
        self
    }

    /// Side region's left edge, clamped into the viewport.
    pub fn side_left(&self) -> f64 {
        let width = self.width.max(0.0);
        match self.side_region_left {
            Some(left) if left.is_finite() => left.clamp(0.0, width),
            _ => width,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width.max(0.0), self.height.max(0.0))
    }
}

/// Computed top-left position for the card, before any drag offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub left: f64,
    pub top: f64,
}

impl Anchor {
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    pub fn to_point(self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Anchor shifted by the manual drag offset.
    #[must_use]
    pub fn offset(self, offset: Offset) -> Self {
        Self::new(self.left + offset.dx, self.top + offset.dy)
    }
}

/// Connector curve plus arrowhead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub curve: CubicBezier,
    pub arrow: Arrowhead,
}

impl Connector {
    pub fn start(&self) -> Point {
        self.curve.p0
    }

    pub fn end(&self) -> Point {
        self.curve.p3
    }
}

/// Everything the renderer needs for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
    pub viewport: Viewport,
    /// Anchor before the drag offset.
    pub anchor: Anchor,
    /// Card box with the drag offset applied.
    pub card: Rect,
    /// Highlight ring around the measured target.
    pub ring: Option<Rect>,
    pub connector: Option<Connector>,
}

impl OverlayGeometry {
    /// No measured target: the card is centered and nothing is highlighted.
    pub fn is_centered(&self) -> bool {
        self.ring.is_none()
    }
}

/// Derives overlay geometry from a target measurement and the viewport.
#[derive(Debug, Clone, Default)]
pub struct PositionEngine {
    config: LayoutConfig,
}

impl PositionEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn card_size(&self) -> Size {
        self.config.card_size()
    }

    /// Card anchor for centered steps.
    pub fn centered_anchor(&self, viewport: &Viewport) -> Anchor {
        let size = self.card_size();
        let mid_x = viewport.side_left() / 2.0;
        let left = (mid_x - size.width / 2.0).max(self.config.min_margin);
        let top = viewport.height / 2.0 - size.height / 2.0;
        Anchor::new(left, top)
    }

    /// Card anchor beside a measured target.
    pub fn targeted_anchor(&self, viewport: &Viewport, target: &Rect) -> Anchor {
        let size = self.card_size();
        let left = viewport.side_left() - self.config.card_gap - size.width;
        let left = left.max(self.config.min_margin);
        let top = target.center_y() - size.height / 2.0;
        Anchor::new(left, top)
    }

    /// Anchor for a step; unmeasurable targets fall back to centered layout.
    pub fn anchor(&self, viewport: &Viewport, target: Option<&Rect>) -> Anchor {
        match target.filter(|rect| rect.is_measurable()) {
            Some(rect) => self.targeted_anchor(viewport, rect),
            None => self.centered_anchor(viewport),
        }
    }

    /// Connector from the card's right edge to the target's left edge.
    pub fn connector(&self, card: &Rect, target: &Rect) -> Connector {
        let standoff = self.config.connector_standoff;
        let start = Point::new(card.right() + standoff, card.center_y());
        let end = Point::new(target.left - standoff, target.center_y());
        let curve = CubicBezier::s_curve(start, end, self.config.curvature);
        let arrow = Arrowhead::at_end(
            &curve,
            self.config.arrow_length,
            self.config.arrow_spread_deg,
        );
        Connector { curve, arrow }
    }

    /// Highlight ring around the target.
    pub fn ring(&self, target: &Rect) -> Rect {
        target.inflate(self.config.ring_padding)
    }

    /// Full geometry for one render pass.
    pub fn layout(
        &self,
        viewport: &Viewport,
        target: Option<&Rect>,
        drag: Offset,
    ) -> OverlayGeometry {
        let target = target.filter(|rect| rect.is_measurable());
        let anchor = self.anchor(viewport, target);
        let card = Rect::from_origin_size(anchor.offset(drag).to_point(), self.card_size());
        let (ring, connector) = match target {
            Some(rect) => (Some(self.ring(rect)), Some(self.connector(&card, rect))),
            None => (None, None),
        };
        OverlayGeometry {
            viewport: *viewport,
            anchor,
            card,
            ring,
            connector,
        }
    }
}
