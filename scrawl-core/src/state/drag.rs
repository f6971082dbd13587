//! Per-pointer drag tracking.

use crate::message::Point;

/// Where the local pointer is in its press/move/release cycle.
///
/// ```text
///  Idle ──press──► Dragging ──release──► Idle
///                   │    ▲
///                   └move┘
/// ```
///
/// `last` is the most recent point of the gesture. It is cleared when the
/// render target changes mid-drag, which turns further moves into no-ops
/// until the next press.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { last: Option<Point> },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// The last touched point, if a gesture is in progress and still has one.
    pub fn last(&self) -> Option<Point> {
        match self {
            Self::Dragging { last } => *last,
            Self::Idle => None,
        }
    }

    pub fn press(&mut self, at: Point) {
        *self = Self::Dragging { last: Some(at) };
    }

    /// Record `to` as the new last point. Has no effect when idle.
    pub fn advance(&mut self, to: Point) {
        if let Self::Dragging { last } = self {
            *last = Some(to);
        }
    }

    /// Forget the last point but stay in the current phase.
    pub fn forget_last(&mut self) {
        if let Self::Dragging { last } = self {
            *last = None;
        }
    }

    pub fn release(&mut self) {
        *self = Self::Idle;
    }
}
