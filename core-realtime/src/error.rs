use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RealtimeError {
    /// Inbound frame was not a valid update
    #[error("Malformed real-time message: {0}")]
    Decode(String),

    #[error("Real-time connection is not open")]
    NotConnected,

    #[error("Socket error: {0}")]
    Transport(#[from] BridgeError),

    /// Outbound message could not be serialized
    #[error("Failed to encode message: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, RealtimeError>;
