//! Live update feed over the real-time transport
//!
//! A plain listener: it opens `{ws_url}/ws/{userId}`, decodes each text frame
//! as a [`PushUpdate`] and hands it to the subscriber. Frames that do not
//! decode are logged and skipped. The feed ends when the server closes the
//! socket, the stream errors, or the subscription is cancelled. It never
//! reconnects; the real-time session owns that state machine.

use bridge_traits::{RealtimeTransport, SocketFrame};
use core_mock::{PushUpdate, Subscription, UpdateSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{debug, error, info};

pub(crate) fn subscribe_live<F>(
    transport: Arc<dyn RealtimeTransport>,
    ws_url: &str,
    connect_timeout: Duration,
    user_id: &str,
    callback: F,
) -> Subscription
where
    F: Fn(PushUpdate) + Send + Sync + 'static,
{
    let url = format!("{}/ws/{}", ws_url, user_id);
    Subscription::spawn(user_id, callback, move |sink| {
        forward(transport, url, connect_timeout, sink)
    })
}

async fn forward(
    transport: Arc<dyn RealtimeTransport>,
    url: String,
    connect_timeout: Duration,
    sink: UpdateSink,
) {
    let mut connection = match time::timeout(connect_timeout, transport.connect(&url)).await {
        Ok(Ok(connection)) => connection,
        Ok(Err(e)) => {
            error!(url = %url, error = %e, "WebSocket error");
            return;
        }
        Err(_) => {
            error!(
                url = %url,
                timeout_ms = connect_timeout.as_millis() as u64,
                "WebSocket connection timed out"
            );
            return;
        }
    };
    info!(url = %url, "WebSocket connected");

    while let Some(frame) = connection.recv().await {
        match frame {
            Ok(SocketFrame::Text(text)) => match serde_json::from_str::<PushUpdate>(&text) {
                Ok(update) => {
                    if !sink.deliver(update) {
                        break;
                    }
                }
                Err(e) => error!(error = %e, "WebSocket message parse error"),
            },
            Ok(SocketFrame::Close { code, reason }) => {
                debug!(code, reason = %reason, "WebSocket closed by server");
                break;
            }
            Err(e) => {
                error!(url = %url, error = %e, "WebSocket error");
                break;
            }
        }
    }

    info!(url = %url, "WebSocket disconnected");
}
