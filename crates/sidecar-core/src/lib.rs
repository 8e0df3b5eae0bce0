#![forbid(unsafe_code)]

//! Core: tour script, state machine, nudging, dragging and configuration.
//!
//! # Role in Sidecar
//! `sidecar-core` owns everything about a tour that does not touch the host
//! page. The tracker (`sidecar-tracker`) feeds it measurements and
//! interaction flags; the position engine (`sidecar-layout`) and renderer
//! (`sidecar-render`) read its state to paint the overlay.
//!
//! # Primary responsibilities
//! - **StepRegistry**: the immutable, ordered script.
//! - **TourState**: the explicit state record with pure transitions.
//! - **TourStateMachine**: side effects around the pure core, including the
//!   exactly-once completion callback.
//! - **NudgeEscalator**: the "one warning, then allow" policy.
//! - **DragController**: the manual card offset.

pub mod config;
pub mod drag;
pub mod geometry;
pub mod machine;
pub mod nudge;
pub mod state;
pub mod step;
pub mod timer;

pub use config::{LayoutConfig, NudgeConfig, TourConfig, TrackerConfig};
#[cfg(feature = "config")]
pub use config::ConfigError;
pub use drag::DragController;
pub use geometry::{Offset, Point, Rect, Size};
pub use machine::{CompletionSink, TourStateMachine};
pub use nudge::{AdvanceDecision, NudgeEscalator, VisibleNudge};
pub use state::{
    AdvanceReason, CompletionReason, TourCommand, TourEvent, TourPhase, TourState, Transition,
};
pub use step::{RegistryError, Step, StepId, StepRegistry, TargetId};
pub use timer::{Countdown, Interval};
