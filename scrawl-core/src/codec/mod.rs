//! Message codec.
//!
//! [`encode`] / [`decode`] convert between [`Message`] and its text form.
//! [`DrawCodec`] frames that text as newline-terminated lines for byte
//! streams, via `tokio_util`.

mod text;

pub use text::{decode, encode, format_coordinate};

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

use crate::error::{Rejection, ScrawlError};
use crate::message::Message;

/// Longest line accepted from a peer, terminator excluded.
pub const MAX_LINE_LENGTH: usize = 1024;

/// One decoded line: a message, or the reason the line was dropped.
pub type Frame = Result<Message, Rejection>;

/// Line framing for scrawl messages.
///
/// Malformed lines are yielded as `Err(Rejection)` items rather than
/// decoder errors, because a decoder error ends a `Framed` stream.
#[derive(Debug)]
pub struct DrawCodec {
    lines: LinesCodec,
}

impl DrawCodec {
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }

    pub fn with_max_length(max: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max),
        }
    }

    fn frame(&self, result: Result<Option<String>, LinesCodecError>) -> Result<Option<Frame>, ScrawlError> {
        match result {
            Ok(Some(line)) => Ok(Some(decode(&line))),
            Ok(None) => Ok(None),
            Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(Err(Rejection::Oversized {
                max: self.lines.max_length(),
            }))),
            // LinesCodec has already consumed the offending line.
            Err(LinesCodecError::Io(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                Ok(Some(Err(Rejection::InvalidUtf8)))
            }
            Err(LinesCodecError::Io(e)) => Err(ScrawlError::Connection(e)),
        }
    }
}

impl Default for DrawCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for DrawCodec {
    type Item = Frame;
    type Error = ScrawlError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let result = self.lines.decode(src);
        self.frame(result)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let result = self.lines.decode_eof(src);
        self.frame(result)
    }
}

impl Encoder<Message> for DrawCodec {
    type Error = ScrawlError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.lines
            .encode(encode(&item), dst)
            .map_err(|e| match e {
                LinesCodecError::Io(e) => ScrawlError::Connection(e),
                LinesCodecError::MaxLineLengthExceeded => {
                    ScrawlError::Other("encoded line exceeds max length".into())
                }
            })
    }
}
