#![forbid(unsafe_code)]

//! Overlay geometry for Sidecar: card anchor, highlight ring and connector.
//!
//! [`PositionEngine`] is pure: the same viewport, target measurement and drag
//! offset always produce the same [`OverlayGeometry`].

pub mod bezier;
pub mod position;

pub use bezier::{Arrowhead, CubicBezier};
pub use position::{Anchor, Connector, OverlayGeometry, PositionEngine, Viewport};
