#![forbid(unsafe_code)]

//! Reference script, page layout and completion sink shared by the test
//! suites.

use std::cell::RefCell;
use std::rc::Rc;

use sidecar_core::geometry::Rect;
use sidecar_core::machine::CompletionSink;
use sidecar_core::step::{RegistryError, Step, StepRegistry};
use sidecar_layout::Viewport;

use crate::fake_host::FakeHost;

/// Viewport used by the reference page: 1440x900 with the side panel from
/// x = 1040.
pub const REFERENCE_VIEWPORT: Viewport = Viewport::new(1440.0, 900.0).with_side_region(1040.0);

/// Target ids of the reference script, in step order.
pub const REFERENCE_TARGETS: [&str; 3] = ["profile-panel", "qa-list", "log-filter"];

/// Steps of the five-step reference script. Steps 0 and 4 are untargeted.
pub fn five_step_steps() -> Vec<Step> {
    vec![
        Step::new("welcome", "Welcome", "Here is the workspace."),
        Step::new("profile", "Profile", "Your profile lives here.")
            .target(REFERENCE_TARGETS[0])
            .action_hint("Open the profile panel"),
        Step::new("questions", "Questions", "Answer a question.")
            .target(REFERENCE_TARGETS[1])
            .action_hint("Pick a question"),
        Step::new("logs", "Logs", "Filter the application log.")
            .target(REFERENCE_TARGETS[2])
            .action_hint("Type a filter"),
        Step::new("finish", "All set", "Enjoy."),
    ]
}

pub fn five_step_script() -> Result<StepRegistry, RegistryError> {
    StepRegistry::new(five_step_steps())
}

/// Host page with every reference target laid out inside the side panel.
pub fn reference_host() -> FakeHost {
    FakeHost::new()
        .with_target(REFERENCE_TARGETS[0], Rect::new(1080.0, 120.0, 320.0, 96.0))
        .with_target(REFERENCE_TARGETS[1], Rect::new(1080.0, 360.0, 320.0, 240.0))
        .with_target(REFERENCE_TARGETS[2], Rect::new(1080.0, 700.0, 320.0, 40.0))
}

/// Completion sink that records every call. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Rc<RefCell<Vec<bool>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags received so far, oldest first.
    pub fn calls(&self) -> Vec<bool> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CompletionSink for RecordingSink {
    fn complete(&mut self, dont_show_again: bool) {
        self.calls.borrow_mut().push(dont_show_again);
    }
}
