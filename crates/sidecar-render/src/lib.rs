#![forbid(unsafe_code)]

//! Overlay rendering for Sidecar tours.
//!
//! [`OverlayRenderer`] combines the state machine's current state with the
//! position engine's geometry and emits an [`OverlayLayer`] display list.
//! [`SvgExporter`] serializes a layer for snapshots.

pub mod layer;
pub mod renderer;
pub mod svg;
pub mod theme;

pub use layer::{
    CardView, Control, ControlKind, DrawOp, Hit, OVERLAY_Z_INDEX, OverlayLayer, Progress,
};
pub use renderer::{CardMetrics, OverlayRenderer};
pub use svg::SvgExporter;
pub use theme::{OverlayTheme, Rgba};
