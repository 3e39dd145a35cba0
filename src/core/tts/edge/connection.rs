//! Socket lifecycle for one synthesis call.
//!
//! [`SpeechTransport`] and [`Connector`] are the seams between the protocol
//! logic and the network. The production implementation wraps a
//! `tokio-tungstenite` WebSocket; unit tests script the transport directly.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Error as WsError, Message},
};
use tracing::{debug, info, warn};

use crate::core::tts::base::{TTSError, TTSResult};

/// A message-framed, bidirectional connection to the synthesis service.
#[async_trait]
pub trait SpeechTransport: Send {
    /// Sends one complete frame as a single text message.
    async fn send_text(&mut self, frame: String) -> TTSResult<()>;

    /// Reads the next data message as raw bytes.
    ///
    /// Text and binary messages are both returned as bytes. `None` means the
    /// remote end closed the connection.
    async fn next_message(&mut self) -> Option<TTSResult<Bytes>>;

    /// Closes the connection.
    async fn close(&mut self) -> TTSResult<()>;
}

/// Opens transports to an endpoint URL.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> TTSResult<Box<dyn SpeechTransport>>;
}

// =============================================================================
// WebSocket implementation
// =============================================================================

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connects with `tokio-tungstenite`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> TTSResult<Box<dyn SpeechTransport>> {
        // `wss://` needs a process-level provider; an existing one is kept.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let (ws, response) = connect_async(url)
            .await
            .map_err(|e| TTSError::Connection(e.to_string()))?;

        debug!(status = %response.status(), "WebSocket upgrade completed");
        Ok(Box::new(WsTransport { ws }))
    }
}

/// [`SpeechTransport`] over a WebSocket stream.
pub struct WsTransport {
    ws: WsStream,
}

#[async_trait]
impl SpeechTransport for WsTransport {
    async fn send_text(&mut self, frame: String) -> TTSResult<()> {
        self.ws
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| TTSError::Stream(e.to_string()))
    }

    async fn next_message(&mut self) -> Option<TTSResult<Bytes>> {
        loop {
            match self.ws.next().await? {
                Ok(Message::Binary(data)) => return Some(Ok(data)),
                Ok(Message::Text(text)) => {
                    return Some(Ok(Bytes::copy_from_slice(text.as_bytes())));
                }
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "Server closed the connection");
                    return None;
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => continue,
                Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => return None,
                Err(e) => return Some(Err(TTSError::Stream(e.to_string()))),
            }
        }
    }

    async fn close(&mut self) -> TTSResult<()> {
        match self.ws.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(TTSError::Stream(e.to_string())),
        }
    }
}

// =============================================================================
// Connection Manager
// =============================================================================

/// Owns one transport from handshake to close.
///
/// `close` is idempotent: the underlying transport is closed at most once,
/// and every operation after that is a no-op.
pub struct ConnectionManager {
    transport: Option<Box<dyn SpeechTransport>>,
}

impl ConnectionManager {
    /// Opens a connection and sends the `speech.config` handshake.
    ///
    /// Resolves once the handshake frame has been written. Any failure is
    /// reported as [`TTSError::Connection`] and leaves nothing open.
    pub async fn open(
        connector: &dyn Connector,
        url: &str,
        config_frame: String,
    ) -> TTSResult<Self> {
        let transport = connector.connect(url).await?;
        let mut manager = Self {
            transport: Some(transport),
        };

        if let Err(e) = manager.send(config_frame).await {
            manager.close().await;
            return Err(TTSError::Connection(format!("handshake failed: {e}")));
        }

        info!("Connected to synthesis service");
        Ok(manager)
    }

    /// Sends one frame.
    pub async fn send(&mut self, frame: String) -> TTSResult<()> {
        match self.transport.as_mut() {
            Some(transport) => transport.send_text(frame).await,
            None => Err(TTSError::Stream("connection already closed".to_string())),
        }
    }

    /// Reads the next inbound message, or `None` once closed.
    pub async fn recv(&mut self) -> Option<TTSResult<Bytes>> {
        self.transport.as_mut()?.next_message().await
    }

    /// Closes the connection if it is still open.
    pub async fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            match transport.close().await {
                Ok(()) => debug!("Connection closed"),
                Err(e) => warn!("Error while closing connection: {}", e),
            }
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    /// Detaches the transport without closing it, for callers that must
    /// finish the close elsewhere.
    pub(crate) fn take_transport(&mut self) -> Option<Box<dyn SpeechTransport>> {
        self.transport.take()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("closed", &self.is_closed())
            .finish()
    }
}
