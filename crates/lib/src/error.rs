//! Error type shared by the request codec, response codec, and session parser.

use thiserror::Error;

/// Errors raised while decoding, encoding, or inspecting webhook payloads.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The body was not valid JSON or did not match the expected shape.
    #[error("decoding webhook payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// The response could not be serialized or written to the sink.
    #[error("encoding webhook response: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("webhook i/o: {0}")]
    Io(#[from] std::io::Error),

    /// Session path had fewer than the 8 `/`-separated segments of
    /// `projects/P/locations/L/agents/A/sessions/S`.
    #[error("malformed session reference: expected 8 segments, found {segments}")]
    MalformedSession { segments: usize },
}

impl WebhookError {
    /// True when the error came from the caller's input rather than from I/O or encoding.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::MalformedSession { .. })
    }
}

pub type Result<T> = std::result::Result<T, WebhookError>;
