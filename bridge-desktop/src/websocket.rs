//! Real-time transport using tokio-tungstenite

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    realtime::{CloseCode, RealtimeConnection, RealtimeTransport, SocketFrame},
};
use futures_util::{SinkExt, StreamExt};
use std::borrow::Cow;
use tokio_tungstenite::tungstenite::{
    self, client::IntoClientRequest, protocol::frame::coding::CloseCode as WsCloseCode,
    protocol::CloseFrame,
};
use tracing::{debug, warn};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// WebSocket transport for desktop hosts.
#[derive(Debug, Clone, Default)]
pub struct TungsteniteTransport;

impl TungsteniteTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RealtimeTransport for TungsteniteTransport {
    async fn connect(&self, url: &str) -> Result<Box<dyn RealtimeConnection>> {
        let request = url
            .into_client_request()
            .map_err(|e| BridgeError::ConnectionFailed(format!("invalid WebSocket URL {url}: {e}")))?;

        let (stream, response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| BridgeError::ConnectionFailed(format!("WebSocket connect failed: {e}")))?;

        debug!(url, status = response.status().as_u16(), "WebSocket connected");
        Ok(Box::new(TungsteniteConnection { stream }))
    }
}

struct TungsteniteConnection {
    stream: WsStream,
}

#[async_trait]
impl RealtimeConnection for TungsteniteConnection {
    async fn send_text(&mut self, text: &str) -> Result<()> {
        self.stream
            .send(tungstenite::Message::Text(text.to_string()))
            .await
            .map_err(|e| BridgeError::ConnectionFailed(format!("WebSocket send failed: {e}")))
    }

    async fn recv(&mut self) -> Option<Result<SocketFrame>> {
        loop {
            match self.stream.next().await {
                Some(Ok(tungstenite::Message::Text(text))) => {
                    return Some(Ok(SocketFrame::Text(text)));
                }
                Some(Ok(tungstenite::Message::Binary(data))) => {
                    match String::from_utf8(data) {
                        Ok(text) => return Some(Ok(SocketFrame::Text(text))),
                        Err(_) => {
                            warn!("Dropping non UTF-8 binary frame");
                            continue;
                        }
                    }
                }
                Some(Ok(tungstenite::Message::Close(close_frame))) => {
                    let (code, reason) = close_frame
                        .map(|cf| (cf.code.into(), cf.reason.to_string()))
                        .unwrap_or((CloseCode::NO_STATUS, String::new()));
                    return Some(Ok(SocketFrame::Close { code, reason }));
                }
                // Pongs are queued by tungstenite itself
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    return Some(Err(BridgeError::ConnectionFailed(format!(
                        "WebSocket read error: {e}"
                    ))));
                }
                None => return None,
            }
        }
    }

    async fn close(&mut self, code: u16, reason: &str) -> Result<()> {
        let frame = CloseFrame {
            code: WsCloseCode::from(code),
            reason: Cow::Owned(reason.to_string()),
        };
        self.stream
            .close(Some(frame))
            .await
            .map_err(|e| BridgeError::ConnectionFailed(format!("WebSocket close failed: {e}")))
    }
}
