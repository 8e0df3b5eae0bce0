#![forbid(unsafe_code)]

//! Sidecar public facade crate.
//!
//! A product tour walks a user through an ordered script of steps, each
//! optionally pointing at a live element of the host page. [`Tour`] is the
//! mounted controller; the host supplies a [`TourHost`] implementation,
//! calls [`Tour::tick`] from its frame loop and paints the [`OverlayLayer`]
//! returned by [`Tour::render`].
//!
//! ```ignore
//! use sidecar::prelude::*;
//!
//! let steps = StepRegistry::new(vec![
//!     Step::new("welcome", "Welcome", "A quick look around."),
//!     Step::new("profile", "Profile", "Your profile lives here.").target("profile-panel"),
//! ])?;
//! let mut tour = Tour::new(page, steps, |dont_show_again| save_pref(dont_show_again));
//! tour.tick(frame_delta);
//! if let Some(layer) = tour.render(&Viewport::new(1440.0, 900.0).with_side_region(1040.0)) {
//!     paint(&layer);
//! }
//! ```

pub mod error;
pub mod tour;

pub use error::{Error, Result};
pub use tour::{PointerEvent, PointerResponse, Tour};

// --- Core re-exports -------------------------------------------------------

#[cfg(feature = "config")]
pub use sidecar_core::ConfigError;
pub use sidecar_core::{
    AdvanceReason, CompletionReason, CompletionSink, LayoutConfig, NudgeConfig, Offset, Point,
    Rect, RegistryError, Size, Step, StepId, StepRegistry, TargetId, TourCommand, TourConfig,
    TourEvent, TourPhase, TourState, TrackerConfig,
};

// --- Layout / tracker / render re-exports ----------------------------------

pub use sidecar_layout::{OverlayGeometry, PositionEngine, Viewport};
pub use sidecar_render::{
    ControlKind, DrawOp, Hit, OverlayLayer, OverlayRenderer, OverlayTheme, Rgba, SvgExporter,
};
pub use sidecar_tracker::{
    InteractionKind, InteractionSource, LayoutChange, LayoutChangeSource, ScrollContainer, SubId,
    TargetLocator, TourHost,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, OverlayLayer, Point, PointerEvent, PointerResponse, Rect, Result, Step, StepRegistry,
        SvgExporter, Tour, TourCommand, TourConfig, TourEvent, TourHost, Viewport,
    };

    pub use crate::{core, layout, render, tracker};
}

pub use sidecar_core as core;
pub use sidecar_layout as layout;
pub use sidecar_render as render;
pub use sidecar_tracker as tracker;
