#![forbid(unsafe_code)]

//! Test support for Sidecar.
//!
//! - [`FakeHost`]: an in-memory page implementing every host capability.
//! - [`fixtures`]: the five-step reference script and page.
//! - [`capture_events`]: collects `tracing` output for assertions.

pub mod fake_host;
pub mod fixtures;
pub mod trace_capture;

pub use fake_host::FakeHost;
pub use fixtures::{
    REFERENCE_TARGETS, REFERENCE_VIEWPORT, RecordingSink, five_step_script, five_step_steps,
    reference_host,
};
pub use trace_capture::{CapturedEvent, capture_events};
