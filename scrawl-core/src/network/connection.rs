//! A line-framed duplex channel over any async byte stream.
//!
//! Background tasks own the socket; the session side only sees an
//! [`Outbound`] handle and a queue of [`ChannelEvent`]s, so the drawing
//! context never awaits on the network.

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{info, warn};

use crate::codec::DrawCodec;
use crate::error::ScrawlError;
use crate::network::ChannelEvent;
use crate::state::Outbound;

/// Inbound events buffered before the reader task waits on the session.
const EVENT_BUFFER: usize = 100;

/// One open channel to the relay.
///
/// The first event is always [`ChannelEvent::Open`] and the last is
/// [`ChannelEvent::Close`]. The writer task runs while any [`Outbound`]
/// handle is alive; the connection releases its own once `Close` is read.
#[derive(Debug)]
pub struct Connection {
    outbound: Option<Outbound>,
    events: mpsc::Receiver<ChannelEvent>,
}

impl Connection {
    /// Wrap a connected byte stream and spawn its reader and writer tasks.
    pub fn new<T>(io: T) -> Self
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (mut net_writer, mut net_reader) = Framed::new(io, DrawCodec::new()).split();

        // Session -> Network
        let (outbound, mut outbound_rx) = Outbound::channel();

        // Network -> Session
        let (event_tx, events) = mpsc::channel(EVENT_BUFFER);

        // Writer task: runs until every Outbound handle is dropped.
        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                if let Err(e) = net_writer.send(message).await {
                    warn!("network write error: {e}");
                    break;
                }
            }
        });

        // Reader task: malformed lines arrive as rejected frames, so only
        // I/O failures or EOF end the loop.
        let open = ChannelEvent::Open(outbound.clone());
        tokio::spawn(async move {
            if event_tx.send(open).await.is_err() {
                return;
            }
            while let Some(result) = net_reader.next().await {
                match result {
                    Ok(frame) => {
                        if event_tx.send(ChannelEvent::Frame(frame)).await.is_err() {
                            // Session dropped its receiver.
                            return;
                        }
                    }
                    Err(e) => {
                        warn!("network read error: {e}");
                        break;
                    }
                }
            }
            let _ = event_tx.send(ChannelEvent::Close).await;
        });

        Self::from_parts(outbound, events)
    }

    /// Connect to a line relay over TCP.
    pub async fn connect(addr: &str) -> Result<Self, ScrawlError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        info!("connected to {addr}");
        Ok(Self::new(stream))
    }

    /// Assemble a connection from a transport that manages its own tasks.
    pub fn from_parts(outbound: Outbound, events: mpsc::Receiver<ChannelEvent>) -> Self {
        Self {
            outbound: Some(outbound),
            events,
        }
    }

    /// A send handle, or `None` after the channel has closed.
    pub fn outbound(&self) -> Option<Outbound> {
        self.outbound.clone()
    }

    /// Next channel event, or `None` once the transport has gone and every
    /// event has been drained.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        let event = self.events.recv().await;
        if matches!(event, None | Some(ChannelEvent::Close)) {
            self.outbound = None;
        }
        event
    }
}
