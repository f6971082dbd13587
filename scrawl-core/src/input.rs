//! Local pointer and palette input → drawing events.
//!
//! These are the operations a presentation layer calls. Strokes are drawn
//! locally right away and forwarded to peers when a channel is open.

use tracing::trace;

use crate::canvas::Surface;
use crate::message::{Color, Message, Point};
use crate::state::{ClearPolicy, DrawingContext};

/// Input from the presentation layer, in a form that can be queued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Press(Point),
    Move(Point),
    Release,
    SetColor(Color),
    Clear,
}

impl<S: Surface> DrawingContext<S> {
    /// Pointer down: start a gesture at `at`.
    pub fn press(&mut self, at: Point) {
        trace!(%at, "press");
        self.drag.press(at);
    }

    /// Pointer moved while possibly dragging.
    ///
    /// Produces a stroke from the last point to `to` in the current color,
    /// renders it, sends it if connected and advances the last point.
    /// Without a render target or a last point this does nothing.
    ///
    /// Both endpoints are rounded to wire precision first, so the local
    /// stroke matches what peers draw.
    pub fn drag_to(&mut self, to: Point) -> Option<Message> {
        if self.surface.is_none() {
            return None;
        }
        let from = self.drag.last()?;

        let message = Message::line(self.color, from, to).quantized();
        self.apply(&message);
        self.broadcast(message);
        self.drag.advance(to);
        Some(message)
    }

    /// Pointer up or left the tracked area.
    pub fn release(&mut self) {
        trace!("release");
        self.drag.release();
    }

    /// Select the color for future strokes.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Ask every client on the topic to clear.
    ///
    /// Returns whether a `Clear` was handed to the transport. Under
    /// [`ClearPolicy::Optimistic`] the local canvas clears immediately even
    /// when disconnected.
    pub fn request_clear(&mut self) -> bool {
        if self.clear_policy == ClearPolicy::Optimistic {
            self.clear_canvas();
        }
        self.broadcast(Message::Clear)
    }

    /// Dispatch a queued [`InputEvent`].
    pub fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(p) => self.press(p),
            InputEvent::Move(p) => {
                self.drag_to(p);
            }
            InputEvent::Release => self.release(),
            InputEvent::SetColor(c) => self.set_color(c),
            InputEvent::Clear => {
                self.request_clear();
            }
        }
    }
}
