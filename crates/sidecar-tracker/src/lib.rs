#![forbid(unsafe_code)]

//! Target tracking for Sidecar tours.
//!
//! The host page exposes its elements through the capability traits in
//! [`host`]. [`TargetTracker`] resolves the active step's target, scrolls it
//! into view, waits for the scroll to settle and keeps the measurement fresh
//! on resize, scroll and a periodic poll.

pub mod host;
pub mod tracker;

pub use host::{
    InteractionKind, InteractionSource, LayoutChange, LayoutChangeSource, ScrollContainer, SubId,
    TargetLocator, TourHost,
};
pub use tracker::{TargetTracker, TrackerEvent, TrackingPhase};
