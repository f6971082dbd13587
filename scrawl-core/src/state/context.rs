//! Per-session drawing context.
//!
//! Ties the render target, the local pointer, the current color and the
//! outbound channel together. One context exists per session and is owned
//! by whatever drives the event loop; every method takes `&mut self` and
//! runs to completion, so no locking is involved.
//!
//! The local input operations live in [`crate::input`] and the channel
//! event handlers in [`crate::network::adapter`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canvas::{self, CanvasConfig, Surface};
use crate::message::{Color, Message, Point};
use crate::state::{ChannelStatus, DragState, Outbound};

/// When a locally requested clear reaches the local canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearPolicy {
    /// Wait for the relay to echo our own `Clear` back.
    #[default]
    Echo,
    /// Clear immediately, and again when the echo arrives.
    Optimistic,
}

pub struct DrawingContext<S> {
    pub(crate) surface: Option<S>,
    pub(crate) drag: DragState,
    pub(crate) color: Color,
    pub(crate) channel: ChannelStatus,
    pub(crate) canvas: CanvasConfig,
    pub(crate) clear_policy: ClearPolicy,
}

impl<S: Surface> DrawingContext<S> {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            surface: None,
            drag: DragState::default(),
            color: Color::default(),
            channel: ChannelStatus::default(),
            canvas,
            clear_policy: ClearPolicy::default(),
        }
    }

    pub fn with_clear_policy(mut self, policy: ClearPolicy) -> Self {
        self.clear_policy = policy;
        self
    }

    // ── Render target ─────────────────────────────────────────────

    /// Bind a render target. The surface is cleared to the background and
    /// any in-progress gesture loses its last point.
    ///
    /// Returns the previously bound surface, if any.
    pub fn mount(&mut self, surface: S) -> Option<S> {
        let previous = self.surface.replace(surface);
        self.clear_canvas();
        self.drag.forget_last();
        previous
    }

    /// Unbind the render target. Rendering becomes a no-op until the next
    /// [`mount`](Self::mount).
    pub fn unmount(&mut self) -> Option<S> {
        self.drag.forget_last();
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    // ── Accessors ─────────────────────────────────────────────────

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    pub fn clear_policy(&self) -> ClearPolicy {
        self.clear_policy
    }

    pub fn channel(&self) -> &ChannelStatus {
        &self.channel
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    // ── Local rendering ───────────────────────────────────────────

    /// Fill the canvas with the background. No-op without a render target.
    pub fn clear_canvas(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            canvas::clear(surface, &self.canvas);
        }
    }

    /// Stroke one segment. No-op without a render target.
    pub fn draw_line(&mut self, color: Color, from: Point, to: Point) {
        if let Some(surface) = self.surface.as_mut() {
            canvas::render_line(surface, &self.canvas, color, from, to);
        }
    }

    /// Apply a message to the local canvas only.
    pub fn apply(&mut self, message: &Message) {
        match *message {
            Message::Clear => self.clear_canvas(),
            Message::Line { color, from, to } => self.draw_line(color, from, to),
        }
    }

    // ── Outbound ──────────────────────────────────────────────────

    /// Send to peers if a channel is open. Returns whether the message was
    /// handed to the transport.
    pub(crate) fn broadcast(&self, message: Message) -> bool {
        let Some(outbound) = self.channel.outbound() else {
            debug!(%message, "not connected; broadcast skipped");
            return false;
        };
        match outbound.send(message) {
            Ok(()) => true,
            Err(e) => {
                debug!(%message, "broadcast dropped: {e}");
                false
            }
        }
    }

    pub(crate) fn install_outbound(&mut self, outbound: Outbound) {
        self.channel.connect(outbound);
    }
}

impl<S: Surface> Default for DrawingContext<S> {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}
