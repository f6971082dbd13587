//! Channel events → drawing context.
//!
//! A transport reports what happens on its duplex channel as
//! [`ChannelEvent`]s; the context reacts by installing or dropping its
//! sender and by applying peer messages to the local canvas. Messages
//! received from peers are never sent on again: the relay behind the
//! topic does the fan-out.

use tracing::{debug, info, warn};

use crate::canvas::Surface;
use crate::codec::{Frame, decode};
use crate::state::{DrawingContext, Outbound};

/// Longest prefix of a rejected frame that is written to the log.
const LOGGED_PREFIX: usize = 64;

/// Something that happened on the duplex channel.
#[derive(Debug)]
pub enum ChannelEvent {
    /// The channel is up; messages can be sent through the handle.
    Open(Outbound),
    /// A raw text frame from a peer, not yet decoded.
    Text(String),
    /// A frame a line codec has already decoded.
    Frame(Frame),
    /// The channel is gone. Always the last event of a connection.
    Close,
}

impl<S: Surface> DrawingContext<S> {
    pub fn channel_opened(&mut self, outbound: Outbound) {
        info!("channel open; broadcasting local strokes");
        self.install_outbound(outbound);
    }

    /// After this, local strokes are still drawn but no longer sent.
    pub fn channel_closed(&mut self) {
        if self.channel.disconnect().is_some() {
            info!("channel closed; local strokes stay local");
        }
    }

    /// Decode and apply one text frame from a peer.
    ///
    /// A rejected frame is logged and otherwise ignored.
    pub fn receive_text(&mut self, text: &str) -> Frame {
        let frame = decode(text);
        if let Err(reason) = &frame {
            let prefix: String = text.chars().take(LOGGED_PREFIX).collect();
            warn!(frame = %prefix, %reason, "rejected peer message");
            return frame;
        }
        self.receive(frame)
    }

    /// Apply a decoded frame from a peer.
    pub fn receive(&mut self, frame: Frame) -> Frame {
        match &frame {
            Ok(message) => {
                debug!(%message, "applying peer message");
                self.apply(message);
            }
            Err(reason) => warn!(%reason, "rejected peer message"),
        }
        frame
    }

    pub fn handle(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Open(outbound) => self.channel_opened(outbound),
            ChannelEvent::Text(text) => {
                self.receive_text(&text);
            }
            ChannelEvent::Frame(frame) => {
                self.receive(frame);
            }
            ChannelEvent::Close => self.channel_closed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Recorder, Stroke};
    use crate::error::Rejection;
    use crate::message::{Color, Message, Point};

    fn mounted() -> DrawingContext<Recorder> {
        let mut ctx = DrawingContext::default();
        ctx.mount(Recorder::new());
        ctx.surface_mut().unwrap().reset();
        ctx
    }

    #[test]
    fn open_and_close_toggle_connection() {
        let mut ctx = mounted();
        let (outbound, _rx) = Outbound::channel();

        ctx.handle(ChannelEvent::Open(outbound));
        assert!(ctx.is_connected());

        ctx.handle(ChannelEvent::Close);
        assert!(!ctx.is_connected());

        // A second close is harmless.
        ctx.handle(ChannelEvent::Close);
        assert!(!ctx.is_connected());
    }

    #[test]
    fn peer_line_is_rendered_not_relayed() {
        let mut ctx = mounted();
        let (outbound, mut rx) = Outbound::channel();
        ctx.channel_opened(outbound);

        let frame = ctx.receive_text("L #000000 10.0 10.0 20.5 15.3");
        assert!(frame.is_ok());
        assert_eq!(
            ctx.surface().unwrap().strokes(),
            vec![Stroke {
                color: Color::BLACK,
                width: 15.0,
                from: Point::new(10.0, 10.0),
                to: Point::new(20.5, 15.3),
            }]
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn peer_clear_fills_background() {
        let mut ctx = mounted();
        ctx.receive_text("L #ff0000 0 0 100 100");
        assert_eq!(ctx.receive_text("C"), Ok(Message::Clear));
        assert_eq!(ctx.surface().unwrap().clears(), 1);
    }

    #[test]
    fn rejected_text_has_no_effect() {
        let mut ctx = mounted();
        let (outbound, _rx) = Outbound::channel();
        ctx.channel_opened(outbound);

        for text in ["", "X", "L #zzzzzz 0 0 1 1", "L #ff0000 a 0 1 1", "L #FF0000 0 0 1 1"] {
            assert!(ctx.receive_text(text).is_err(), "{text:?}");
        }
        assert!(ctx.surface().unwrap().ops().is_empty());
        assert!(ctx.is_connected());
    }

    #[test]
    fn rejected_frame_has_no_effect() {
        let mut ctx = mounted();
        ctx.handle(ChannelEvent::Frame(Err(Rejection::Oversized { max: 1024 })));
        assert!(ctx.surface().unwrap().ops().is_empty());
    }

    #[test]
    fn receive_without_surface_is_noop() {
        let mut ctx: DrawingContext<Recorder> = DrawingContext::default();
        assert_eq!(ctx.receive_text("C"), Ok(Message::Clear));
        assert!(ctx.surface().is_none());
    }

    #[test]
    fn strokes_after_close_stay_local() {
        let mut ctx = mounted();
        let (outbound, mut rx) = Outbound::channel();
        ctx.channel_opened(outbound);
        ctx.channel_closed();

        ctx.press(Point::new(0.0, 0.0));
        assert!(ctx.drag_to(Point::new(1.0, 1.0)).is_some());
        assert_eq!(ctx.surface().unwrap().strokes().len(), 1);
        assert!(rx.try_recv().is_err());
    }
}
