//! # scrawl-core
//!
//! Protocol and session library for scrawl, a shared real-time drawing
//! surface where every stroke one client draws shows up on every other
//! client subscribed to the same topic.
//!
//! This crate contains:
//! - **Message model**: `Message`, `Color`, `Point`
//! - **Codec**: text `encode`/`decode` and `DrawCodec` line framing via `tokio_util`
//! - **Canvas**: the `Surface` contract plus the clear / stroke operations
//! - **State**: `DrawingContext`, channel status and drag tracking
//! - **Input**: the press / move / release / color / clear operations
//! - **Network**: `ChannelEvent` handling and a line-framed `Connection`
//! - **Error**: `Rejection` for discarded peer frames, `ScrawlError` for the rest

pub mod canvas;
pub mod codec;
pub mod error;
pub mod input;
pub mod message;
pub mod network;
pub mod state;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use canvas::{CanvasConfig, Recorder, Surface};
pub use codec::{DrawCodec, Frame, MAX_LINE_LENGTH, decode, encode};
pub use error::{Rejection, ScrawlError};
pub use input::InputEvent;
pub use message::{Color, Message, Point};
pub use network::{ChannelEvent, Connection};
pub use state::{ChannelStatus, ClearPolicy, DragState, DrawingContext, Outbound};
