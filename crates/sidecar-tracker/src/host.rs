#![forbid(unsafe_code)]

//! Capabilities the host page provides to the tracker.
//!
//! The tracker never touches a DOM or a global registry directly. Everything
//! it needs from the page comes through these traits, so tests can swap in a
//! fake page and production hosts can back them with whatever lookup and
//! event delivery their toolkit offers.
//!
//! Subscriptions are pull-based: the host queues notifications per
//! subscription and the tracker drains them on each tick. Unsubscribing
//! drops the queue.

use sidecar_core::geometry::Rect;
use sidecar_core::step::TargetId;

/// Handle for a layout or interaction subscription.
pub type SubId = u64;

/// Finds live target elements by identifier.
pub trait TargetLocator {
    /// Current bounding rectangle of the element exposing `target`, or `None`
    /// if no such element is on the page.
    fn locate(&self, target: &TargetId) -> Option<Rect>;
}

/// The scrollable container the tour scrolls within.
pub trait ScrollContainer {
    /// Request that the element be scrolled to the container's center.
    ///
    /// May animate; the tracker waits a settle delay before measuring.
    fn scroll_into_center(&mut self, target: &TargetId);
}

/// Viewport mutations that can move a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutChange {
    Resize,
    Scroll,
}

/// Delivers viewport resize and scroll notifications.
pub trait LayoutChangeSource {
    fn subscribe_layout(&mut self) -> SubId;
    fn unsubscribe_layout(&mut self, id: SubId);
    /// Take every notification queued for `id` since the last drain.
    fn drain_layout_changes(&mut self, id: SubId) -> Vec<LayoutChange>;
}

/// User interactions with a target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
    TextInput,
    Focus,
    Hover,
}

impl InteractionKind {
    /// Whether the interaction satisfies a step's gate.
    ///
    /// Only deliberate primary actions count; focusing or hovering do not.
    pub fn is_primary_action(self) -> bool {
        matches!(self, Self::Click | Self::TextInput)
    }
}

/// Delivers interactions happening on one target element.
pub trait InteractionSource {
    fn attach_interactions(&mut self, target: &TargetId) -> SubId;
    fn detach_interactions(&mut self, id: SubId);
    /// Take every interaction queued for `id` since the last drain.
    fn drain_interactions(&mut self, id: SubId) -> Vec<InteractionKind>;
}

/// Everything a tour needs from its host page.
pub trait TourHost: TargetLocator + ScrollContainer + LayoutChangeSource + InteractionSource {}

impl<T> TourHost for T where
    T: TargetLocator + ScrollContainer + LayoutChangeSource + InteractionSource + ?Sized
{
}
