#![forbid(unsafe_code)]

//! In-memory host page.
//!
//! [`FakeHost`] implements every capability trait the tracker needs. Tests
//! add, move and remove targets, inject resize/scroll notifications and
//! interactions, and then inspect which subscriptions are still alive.
//!
//! Notifications are queued per subscription exactly like a real host
//! delivering events to registered listeners: a notification pushed while no
//! one is subscribed is dropped.

use std::collections::BTreeMap;

use sidecar_core::geometry::Rect;
use sidecar_core::step::TargetId;
use sidecar_tracker::host::{
    InteractionKind, InteractionSource, LayoutChange, LayoutChangeSource, ScrollContainer, SubId,
    TargetLocator,
};

#[derive(Debug, Clone)]
struct Listener {
    target: TargetId,
    queue: Vec<InteractionKind>,
}

/// A page with named targets and synchronous event delivery.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    targets: BTreeMap<TargetId, Rect>,
    layout_subs: BTreeMap<SubId, Vec<LayoutChange>>,
    listeners: BTreeMap<SubId, Listener>,
    scroll_requests: Vec<TargetId>,
    center_height: Option<f64>,
    next_sub: SubId,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FakeHost::insert_target`].
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>, rect: Rect) -> Self {
        self.insert_target(target, rect);
        self
    }

    /// Make scroll requests actually move the requested target so its
    /// vertical center lands at `viewport_height / 2`.
    ///
    /// Without this, scroll requests are only recorded.
    #[must_use]
    pub fn centering_scroll(mut self, viewport_height: f64) -> Self {
        self.center_height = Some(viewport_height);
        self
    }

    pub fn insert_target(&mut self, target: impl Into<String>, rect: Rect) {
        self.targets.insert(TargetId::new(target), rect);
    }

    /// Remove a target from the page. Returns its last rectangle.
    pub fn remove_target(&mut self, target: &str) -> Option<Rect> {
        self.targets.remove(&TargetId::new(target))
    }

    /// Move an existing target without notifying anyone, the way an
    /// animation or late reflow would.
    pub fn move_target(&mut self, target: &str, rect: Rect) -> bool {
        match self.targets.get_mut(&TargetId::new(target)) {
            Some(slot) => {
                *slot = rect;
                true
            }
            None => false,
        }
    }

    pub fn push_resize(&mut self) {
        self.broadcast(LayoutChange::Resize);
    }

    pub fn push_scroll(&mut self) {
        self.broadcast(LayoutChange::Scroll);
    }

    /// Deliver an interaction to every listener attached to `target`.
    /// Returns how many listeners received it.
    pub fn interact(&mut self, target: &str, kind: InteractionKind) -> usize {
        let mut delivered = 0;
        for listener in self.listeners.values_mut() {
            if listener.target.as_str() == target {
                listener.queue.push(kind);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn click(&mut self, target: &str) -> usize {
        self.interact(target, InteractionKind::Click)
    }

    pub fn live_layout_subscriptions(&self) -> usize {
        self.layout_subs.len()
    }

    pub fn live_interaction_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Layout subscriptions plus interaction listeners.
    pub fn live_subscriptions(&self) -> usize {
        self.live_layout_subscriptions() + self.live_interaction_listeners()
    }

    /// Targets that asked to be scrolled into view, in request order.
    pub fn scroll_requests(&self) -> &[TargetId] {
        &self.scroll_requests
    }

    pub fn clear_scroll_requests(&mut self) {
        self.scroll_requests.clear();
    }

    fn broadcast(&mut self, change: LayoutChange) {
        for queue in self.layout_subs.values_mut() {
            queue.push(change);
        }
    }

    fn allocate(&mut self) -> SubId {
        self.next_sub += 1;
        self.next_sub
    }
}

impl TargetLocator for FakeHost {
    fn locate(&self, target: &TargetId) -> Option<Rect> {
        self.targets.get(target).copied()
    }
}

impl ScrollContainer for FakeHost {
    fn scroll_into_center(&mut self, target: &TargetId) {
        self.scroll_requests.push(target.clone());
        let Some(height) = self.center_height else {
            return;
        };
        let Some(rect) = self.targets.get(target).copied() else {
            return;
        };
        let shift = height / 2.0 - rect.center_y();
        if shift != 0.0 {
            for other in self.targets.values_mut() {
                other.top += shift;
            }
            self.broadcast(LayoutChange::Scroll);
        }
    }
}

impl LayoutChangeSource for FakeHost {
    fn subscribe_layout(&mut self) -> SubId {
        let id = self.allocate();
        self.layout_subs.insert(id, Vec::new());
        id
    }

    fn unsubscribe_layout(&mut self, id: SubId) {
        self.layout_subs.remove(&id);
    }

    fn drain_layout_changes(&mut self, id: SubId) -> Vec<LayoutChange> {
        self.layout_subs
            .get_mut(&id)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

impl InteractionSource for FakeHost {
    fn attach_interactions(&mut self, target: &TargetId) -> SubId {
        let id = self.allocate();
        self.listeners.insert(
            id,
            Listener {
                target: target.clone(),
                queue: Vec::new(),
            },
        );
        id
    }

    fn detach_interactions(&mut self, id: SubId) {
        self.listeners.remove(&id);
    }

    fn drain_interactions(&mut self, id: SubId) -> Vec<InteractionKind> {
        self.listeners
            .get_mut(&id)
            .map(|listener| std::mem::take(&mut listener.queue))
            .unwrap_or_default()
    }
}
