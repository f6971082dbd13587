//! Outbound channel status.
//!
//! The sender handle only exists while a transport is open, so the
//! status and the handle are one value:
//!
//! ```text
//!  Disconnected ──open──► Connected(Outbound)
//!       ▲                        │
//!       └──────────close─────────┘
//! ```

use tokio::sync::mpsc;

use crate::error::ScrawlError;
use crate::message::Message;

// ── Outbound ─────────────────────────────────────────────────────

/// Handle used to transmit messages to peers.
///
/// Wraps an unbounded mpsc sender drained by a transport writer task, so
/// `send` never blocks and never waits on the network.
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::UnboundedSender<Message>,
}

impl Outbound {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { tx }
    }

    /// A fresh handle together with the receiver a writer task drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queue a message for transmission. Fire-and-forget.
    pub fn send(&self, message: Message) -> Result<(), ScrawlError> {
        self.tx.send(message)?;
        Ok(())
    }

    /// `true` once the writer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

// ── ChannelStatus ────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub enum ChannelStatus {
    #[default]
    Disconnected,
    Connected(Outbound),
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected(_) => write!(f, "Connected"),
        }
    }
}

impl ChannelStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    pub fn outbound(&self) -> Option<&Outbound> {
        match self {
            Self::Connected(outbound) => Some(outbound),
            Self::Disconnected => None,
        }
    }

    /// Install a sender, replacing any previous one.
    pub fn connect(&mut self, outbound: Outbound) {
        *self = Self::Connected(outbound);
    }

    /// Drop the sender. Returns it if one was installed.
    pub fn disconnect(&mut self) -> Option<Outbound> {
        match std::mem::take(self) {
            Self::Connected(outbound) => Some(outbound),
            Self::Disconnected => None,
        }
    }
}
