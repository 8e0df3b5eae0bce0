#![forbid(unsafe_code)]

//! Pointer-driven repositioning of the sidecar card.
//!
//! The controller accumulates an [`Offset`] that the renderer adds to the
//! computed anchor. It is deliberately toolkit-agnostic: hosts translate their
//! own pointer events into [`DragController::begin_drag`],
//! [`DragController::update_drag`] and [`DragController::end_drag`].
//!
//! # Invariants
//!
//! 1. Outside a drag the offset only changes through [`DragController::reset`].
//! 2. During a drag the offset is always `offset_at_start + (pointer - origin)`.
//! 3. Pointer reports at exactly `(0, 0)` are the drag-end sentinel many
//!    toolkits emit as the last move event; they are discarded so the card
//!    does not snap toward the origin.

use crate::geometry::{Offset, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    origin: Point,
    offset_at_start: Offset,
}

/// Accumulates the manual card offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragController {
    offset: Offset,
    session: Option<DragSession>,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current accumulated offset.
    #[inline]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Record the pointer and the offset in effect when the drag starts.
    ///
    /// Starting a new drag while one is active re-bases on the current offset.
    pub fn begin_drag(&mut self, origin: Point) {
        if !origin.is_finite() {
            return;
        }
        self.session = Some(DragSession {
            origin,
            offset_at_start: self.offset,
        });
        #[cfg(feature = "tracing")]
        tracing::trace!(x = origin.x, y = origin.y, "drag started");
    }

    /// Apply a pointer move. Returns the new offset when it was applied.
    pub fn update_drag(&mut self, pointer: Point) -> Option<Offset> {
        let session = self.session?;
        if is_end_sentinel(pointer) || !pointer.is_finite() {
            return None;
        }
        self.offset = session.offset_at_start + (pointer - session.origin);
        Some(self.offset)
    }

    /// Finish the drag, applying the final pointer position unless it is the
    /// end sentinel.
    pub fn end_drag(&mut self, pointer: Point) -> Offset {
        let _ = self.update_drag(pointer);
        self.session = None;
        #[cfg(feature = "tracing")]
        tracing::trace!(dx = self.offset.dx, dy = self.offset.dy, "drag ended");
        self.offset
    }

    /// Drop any drag in progress and return to a zero offset.
    pub fn reset(&mut self) {
        self.offset = Offset::ZERO;
        self.session = None;
    }
}

#[inline]
fn is_end_sentinel(pointer: Point) -> bool {
    pointer == Point::ORIGIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_follows_pointer_delta() {
        let mut drag = DragController::new();
        drag.begin_drag(Point::new(100.0, 100.0));
        assert_eq!(
            drag.update_drag(Point::new(130.0, 90.0)),
            Some(Offset::new(30.0, -10.0))
        );
        assert_eq!(drag.offset(), Offset::new(30.0, -10.0));
    }

    #[test]
    fn second_drag_accumulates_from_previous_offset() {
        let mut drag = DragController::new();
        drag.begin_drag(Point::new(10.0, 10.0));
        drag.end_drag(Point::new(20.0, 30.0));
        assert_eq!(drag.offset(), Offset::new(10.0, 20.0));

        drag.begin_drag(Point::new(50.0, 50.0));
        drag.update_drag(Point::new(45.0, 55.0));
        assert_eq!(drag.offset(), Offset::new(5.0, 25.0));
    }

    #[test]
    fn end_sentinel_is_discarded() {
        let mut drag = DragController::new();
        drag.begin_drag(Point::new(200.0, 200.0));
        drag.update_drag(Point::new(210.0, 220.0));
        assert_eq!(drag.update_drag(Point::ORIGIN), None);
        assert_eq!(drag.offset(), Offset::new(10.0, 20.0));
        assert_eq!(drag.end_drag(Point::ORIGIN), Offset::new(10.0, 20.0));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn moves_outside_a_drag_are_ignored() {
        let mut drag = DragController::new();
        assert_eq!(drag.update_drag(Point::new(5.0, 5.0)), None);
        assert_eq!(drag.offset(), Offset::ZERO);
    }

    #[test]
    fn non_finite_pointer_is_ignored() {
        let mut drag = DragController::new();
        drag.begin_drag(Point::new(f64::NAN, 1.0));
        assert!(!drag.is_dragging());
        drag.begin_drag(Point::new(1.0, 1.0));
        assert_eq!(drag.update_drag(Point::new(f64::INFINITY, 1.0)), None);
        assert_eq!(drag.offset(), Offset::ZERO);
    }

    #[test]
    fn reset_clears_offset_and_session() {
        let mut drag = DragController::new();
        drag.begin_drag(Point::new(1.0, 1.0));
        drag.update_drag(Point::new(11.0, 1.0));
        drag.reset();
        assert_eq!(drag.offset(), Offset::ZERO);
        assert!(!drag.is_dragging());
    }
}
