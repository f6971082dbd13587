pub mod channel;
mod context;
mod drag;

pub use channel::{ChannelStatus, Outbound};
pub use context::{ClearPolicy, DrawingContext};
pub use drag::DragState;
