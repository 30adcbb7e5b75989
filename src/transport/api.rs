use std::fmt;

use async_trait::async_trait;

use crate::core::action::ActionRequest;
use crate::core::outcome::ActionResult;

/// Why a request produced no result. The page is left unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection-level failure (refused, reset, DNS).
    Network(String),
    /// The server answered with a non-success HTTP status.
    Api { status: u16, message: String },
    /// The body was not a result object.
    Decode(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            TransportError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the name of the transport.
    fn name(&self) -> &str;

    /// Sends one mutation and waits for its single result. No retries.
    async fn post(&self, request: &ActionRequest) -> Result<ActionResult, TransportError>;
}
