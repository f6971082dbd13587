pub mod adapter;
pub mod connection;

pub use adapter::ChannelEvent;
pub use connection::Connection;
