//! Error types for the PitchLens client

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by every PitchLens client operation.
///
/// Nothing is retried or recovered locally: each variant carries enough
/// detail (endpoint, status, identifier) for the caller to act on.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network-level failure (DNS, connection refused, body read)
    #[error("Transport error at {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The transport gave up waiting for the server
    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    /// No presentation exists for the requested RFC
    #[error("Presentation not found for RFC: {rfc}")]
    NotFound { rfc: String },

    /// The server answered with a non-2xx status.
    ///
    /// `status_text` is the canonical reason phrase for `status`, or
    /// "Unknown Status" when the code has none.
    #[error(
        "Request failed: {} - {}{}",
        .status,
        .status_text,
        .detail.as_deref().map(|d| format!(" ({})", d)).unwrap_or_default()
    )]
    RequestFailed {
        status: u16,
        status_text: String,
        /// Server-provided `error` message, when the body carried one
        detail: Option<String>,
    },

    /// Body was not JSON, or did not match the expected schema
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upload source does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Upload source is not a video format the server accepts
    #[error("Unsupported file type '{0}' (expected one of: mp4, webm, avi, mov, mkv)")]
    UnsupportedFileType(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for PitchLens client operations
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NotFound { .. } => Some(404),
            ClientError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before any HTTP response was received.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport { .. } | ClientError::Timeout { .. }
        )
    }

    pub(crate) fn malformed(endpoint: &str, err: serde_json::Error) -> Self {
        ClientError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Decode a JSON body received from `endpoint`.
///
/// Any parse or schema failure becomes [`ClientError::MalformedResponse`].
pub fn decode_body<T: serde::de::DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ClientError::malformed(endpoint, e))
}
