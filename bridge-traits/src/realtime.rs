//! Real-Time Socket Abstraction
//!
//! A duplex, text-framed connection used for live update delivery. The core
//! owns the connection state machine; hosts only provide the socket.

use async_trait::async_trait;

use crate::error::Result;

/// Well-known close codes.
pub struct CloseCode;

impl CloseCode {
    /// Normal closure
    pub const NORMAL: u16 = 1000;
    /// Close frame without a status code
    pub const NO_STATUS: u16 = 1005;
    /// Connection dropped without a close frame
    pub const ABNORMAL: u16 = 1006;
}

/// A frame received from the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketFrame {
    /// UTF-8 text payload
    Text(String),
    /// Remote closed the connection
    Close { code: u16, reason: String },
}

impl SocketFrame {
    pub fn is_normal_close(&self) -> bool {
        matches!(self, SocketFrame::Close { code, .. } if *code == CloseCode::NORMAL)
    }
}

/// An open real-time connection.
///
/// Control frames (ping/pong) are handled by the implementation and never
/// surface through [`recv`](RealtimeConnection::recv).
#[async_trait]
pub trait RealtimeConnection: Send {
    /// Send a text frame
    async fn send_text(&mut self, text: &str) -> Result<()>;

    /// Wait for the next frame
    ///
    /// Returns `None` once the stream has ended.
    async fn recv(&mut self) -> Option<Result<SocketFrame>>;

    /// Close the connection with the given code
    async fn close(&mut self, code: u16, reason: &str) -> Result<()>;
}

/// Factory for real-time connections
///
/// # Example
///
/// ```ignore
/// use bridge_traits::realtime::RealtimeTransport;
///
/// async fn open(transport: &dyn RealtimeTransport) -> Result<()> {
///     let mut conn = transport.connect("ws://localhost:3001/ws/tenant-101").await?;
///     conn.send_text(r#"{"type":"ping"}"#).await
/// }
/// ```
#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    /// Open a connection to `url`
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConnectionFailed`](crate::BridgeError::ConnectionFailed)
    /// when the handshake does not complete.
    async fn connect(&self, url: &str) -> Result<Box<dyn RealtimeConnection>>;
}
