//! Client error types.

use ethereal_signer::{KeyError, SignerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response from the exchange.
    #[error("ethereal error {status}: {body}")]
    Transport { status: u16, body: String },

    /// Response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Request never produced a response (connect, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Batch slot was not issued because the caller cancelled.
    #[error("submission cancelled before it was issued")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("no subaccount found for sender {0}")]
    NoSubaccount(String),

    /// A batch task panicked or was aborted.
    #[error("batch task failed: {0}")]
    TaskFailed(String),

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("Key error: {0}")]
    Key(#[from] KeyError),
}

impl ClientError {
    /// Short label used as the metrics `outcome`.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport_error",
            Self::Decode(_) => "decode_error",
            Self::Http(_) => "http_error",
            Self::Cancelled => "cancelled",
            Self::Config(_) | Self::Key(_) => "config_error",
            Self::NoSubaccount(_) => "no_subaccount",
            Self::TaskFailed(_) => "task_failed",
            Self::Signer(_) => "signing_error",
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
