//! Opening the channel to the relay.
//!
//! WebSocket relays carry one message per text frame. Plain TCP relays
//! carry one message per line and use the core line connection.

use std::fmt;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};
use url::Url;

use scrawl_core::{
    ChannelEvent, Connection, MAX_LINE_LENGTH, Outbound, Rejection, ScrawlError, encode,
};

use crate::config::{ClientConfig, NetworkConfig};

const EVENT_BUFFER: usize = 100;

/// Where the client connects, derived from the network config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Full WebSocket URL including topic path and token query.
    WebSocket(String),
    /// `host:port` of a line relay.
    Tcp(String),
}

impl Endpoint {
    /// Topic and token are percent-encoded into the path and query.
    pub fn from_config(network: &NetworkConfig) -> Result<Self, ScrawlError> {
        if let Some(addr) = network.server.strip_prefix("tcp://") {
            return Ok(Endpoint::Tcp(addr.trim_end_matches('/').to_string()));
        }

        let mut url = Url::parse(&network.server).map_err(|e| {
            ScrawlError::Config(format!("invalid server url {:?}: {e}", network.server))
        })?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ScrawlError::Config(format!(
                "unsupported server url {:?} (expected ws://, wss:// or tcp://)",
                network.server
            )));
        }
        url.path_segments_mut()
            .map_err(|()| {
                ScrawlError::Config(format!("server url {:?} cannot take a path", network.server))
            })?
            .pop_if_empty()
            .push("websocket")
            .push(&network.topic);
        if !network.token.is_empty() {
            url.query_pairs_mut().append_pair("token", &network.token);
        }
        Ok(Endpoint::WebSocket(url.into()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Keep the token out of logs.
            Endpoint::WebSocket(url) => write!(f, "{}", url.split('?').next().unwrap_or(url)),
            Endpoint::Tcp(addr) => write!(f, "tcp://{addr}"),
        }
    }
}

/// Connect to the configured relay within `timeout_ms`.
pub async fn open(config: &ClientConfig) -> Result<Connection, ScrawlError> {
    let endpoint = Endpoint::from_config(&config.network)?;
    let timeout = Duration::from_millis(config.network.timeout_ms);

    info!("connecting to {endpoint}");
    let connect = async {
        match &endpoint {
            Endpoint::Tcp(addr) => Connection::connect(addr).await,
            Endpoint::WebSocket(url) => connect_websocket(url).await,
        }
    };
    tokio::time::timeout(timeout, connect)
        .await
        .map_err(|_| ScrawlError::Timeout(timeout))?
}

async fn connect_websocket(url: &str) -> Result<Connection, ScrawlError> {
    let (ws, _response) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| ScrawlError::Other(format!("websocket handshake failed: {e}")))?;
    let (mut ws_writer, mut ws_reader) = ws.split();

    // Session -> Network
    let (outbound, mut outbound_rx) = Outbound::channel();

    // Network -> Session
    let (event_tx, events) = mpsc::channel(EVENT_BUFFER);

    tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if let Err(e) = ws_writer.send(WsMessage::text(encode(&message))).await {
                warn!("websocket write error: {e}");
                break;
            }
        }
        let _ = ws_writer.close().await;
    });

    let opened = ChannelEvent::Open(outbound.clone());
    tokio::spawn(async move {
        if event_tx.send(opened).await.is_err() {
            return;
        }
        while let Some(result) = ws_reader.next().await {
            let event = match result {
                Ok(WsMessage::Text(text)) => text_event(text.as_str()),
                Ok(WsMessage::Close(frame)) => {
                    debug!(?frame, "relay closed the websocket");
                    break;
                }
                // Ping/pong is answered by tungstenite; binary frames are not part of the protocol.
                Ok(other) => {
                    debug!("ignoring non-text frame ({} bytes)", other.len());
                    continue;
                }
                Err(e) => {
                    warn!("websocket read error: {e}");
                    break;
                }
            };
            if event_tx.send(event).await.is_err() {
                return;
            }
        }
        let _ = event_tx.send(ChannelEvent::Close).await;
    });

    Ok(Connection::from_parts(outbound, events))
}

/// Same size limit as the line transport.
fn text_event(text: &str) -> ChannelEvent {
    if text.len() > MAX_LINE_LENGTH {
        ChannelEvent::Frame(Err(Rejection::Oversized {
            max: MAX_LINE_LENGTH,
        }))
    } else {
        ChannelEvent::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(server: &str, token: &str) -> NetworkConfig {
        NetworkConfig {
            server: server.into(),
            token: token.into(),
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn websocket_url_includes_topic_and_token() {
        let ep = Endpoint::from_config(&network("wss://relay.example/", "abc123")).unwrap();
        assert_eq!(
            ep,
            Endpoint::WebSocket("wss://relay.example/websocket/draw.volatile?token=abc123".into())
        );
        assert_eq!(ep.to_string(), "wss://relay.example/websocket/draw.volatile");
    }

    #[test]
    fn websocket_url_without_token() {
        let ep = Endpoint::from_config(&network("ws://127.0.0.1:8080", "")).unwrap();
        assert_eq!(
            ep,
            Endpoint::WebSocket("ws://127.0.0.1:8080/websocket/draw.volatile".into())
        );
    }

    #[test]
    fn websocket_url_encodes_topic_and_token() {
        let mut net = network("ws://relay.example/base", "a&b c#d");
        net.topic = "team room/1".into();
        let ep = Endpoint::from_config(&net).unwrap();
        assert_eq!(
            ep,
            Endpoint::WebSocket(
                "ws://relay.example/base/websocket/team%20room%2F1?token=a%26b+c%23d".into()
            )
        );
    }

    #[test]
    fn tcp_endpoint() {
        let ep = Endpoint::from_config(&network("tcp://10.0.0.2:7000", "ignored")).unwrap();
        assert_eq!(ep, Endpoint::Tcp("10.0.0.2:7000".into()));
    }

    #[test]
    fn unknown_scheme_is_config_error() {
        let err = Endpoint::from_config(&network("http://x", "")).unwrap_err();
        assert!(matches!(err, ScrawlError::Config(_)));
        let err = Endpoint::from_config(&network("not a url", "")).unwrap_err();
        assert!(matches!(err, ScrawlError::Config(_)));
    }

    #[test]
    fn oversized_text_frame_is_rejected() {
        let big = "L".repeat(MAX_LINE_LENGTH + 1);
        assert!(matches!(
            text_event(&big),
            ChannelEvent::Frame(Err(Rejection::Oversized { .. }))
        ));
        assert!(matches!(text_event("C"), ChannelEvent::Text(t) if t == "C"));
    }

    #[tokio::test]
    async fn tcp_connect_failure_is_reported() {
        // Bind then drop to get a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut cfg = ClientConfig::default();
        cfg.network.server = format!("tcp://{addr}");
        assert!(open(&cfg).await.is_err());
    }
}
