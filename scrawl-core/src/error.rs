//! Domain-specific error types for the scrawl protocol.
//!
//! Two families live here:
//! - [`Rejection`] explains why an inbound frame was discarded. It is an
//!   ordinary value, never a fault: peers may send anything.
//! - [`ScrawlError`] covers environment failures (I/O, closed channels,
//!   bad configuration values).

use std::time::Duration;

use thiserror::Error;

// ── Rejection ────────────────────────────────────────────────────

/// Why a frame received from the network was not accepted as a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The frame carried no characters at all.
    #[error("empty frame")]
    Empty,

    /// The frame did not start with a known message tag.
    #[error("unknown tag: {0:?}")]
    UnknownTag(String),

    /// A `C` frame carried anything after the tag.
    #[error("unexpected content after clear tag")]
    TrailingContent,

    /// A `L` frame did not split into exactly six space-separated tokens.
    #[error("line frame has {found} tokens (expected 6)")]
    TokenCount { found: usize },

    /// The color token is not `#` followed by six lowercase hex digits.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// A coordinate token is not a finite decimal number.
    #[error("invalid {field} coordinate: {token:?}")]
    InvalidCoordinate { field: &'static str, token: String },

    /// A framed line exceeded the maximum line length.
    #[error("frame exceeds {max} bytes")]
    Oversized { max: usize },

    /// A framed line was not valid UTF-8.
    #[error("frame is not valid utf-8")]
    InvalidUtf8,
}

// ── ScrawlError ──────────────────────────────────────────────────

/// The canonical error type for fallible scrawl operations.
#[derive(Debug, Error)]
pub enum ScrawlError {
    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// The other half of an mpsc channel was dropped.
    #[error("channel closed")]
    ChannelClosed,

    /// An operation exceeded its deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// A color string supplied locally (config, user input) is malformed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// A configuration value could not be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for ScrawlError {
    fn from(s: String) -> Self {
        ScrawlError::Other(s)
    }
}

impl From<&str> for ScrawlError {
    fn from(s: &str) -> Self {
        ScrawlError::Other(s.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for ScrawlError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        ScrawlError::ChannelClosed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_display_messages() {
        let r = Rejection::TokenCount { found: 5 };
        assert!(r.to_string().contains('5'));

        let r = Rejection::InvalidCoordinate {
            field: "from.x",
            token: "a".into(),
        };
        assert!(r.to_string().contains("from.x"));
    }

    #[test]
    fn from_string() {
        let e: ScrawlError = "something broke".into();
        assert!(matches!(e, ScrawlError::Other(_)));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: ScrawlError = io_err.into();
        assert!(matches!(e, ScrawlError::Connection(_)));
    }

    #[test]
    fn from_send_error() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<u8>();
        drop(rx);
        let e: ScrawlError = tx.send(1).unwrap_err().into();
        assert!(matches!(e, ScrawlError::ChannelClosed));
    }
}
