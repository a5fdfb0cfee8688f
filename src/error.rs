//! Transport error taxonomy.
//!
//! Every network-calling operation converts its failure into one of these
//! variants; nothing is fatal to the process. Controllers render them as
//! inline messages or blocking notifications, never as panics.

/// Errors from transport operations against the Rewardify backend.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// TCP/TLS-level failure before any HTTP exchange happened.
    #[error("Could not reach the server at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Non-2xx response. `message` is already human-readable: the server's
    /// `detail`/`message`/`error` field, or an operation-specific fallback.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape.
    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),

    /// Client-side rejection: empty or whitespace-only search query.
    /// No request is sent.
    #[error("Search query is empty")]
    EmptyQuery,

    /// Client-side rejection: the chosen file is not a spreadsheet.
    /// No request is sent.
    #[error("{0} is not a spreadsheet file")]
    UnsupportedFile(String),

    /// Any other reqwest-level failure (redirect loops, body errors, ...).
    #[error("HTTP error: {0}")]
    Http(String),
}

impl TransportError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before a request was sent.
    pub fn is_client_side(&self) -> bool {
        matches!(self, Self::EmptyQuery | Self::UnsupportedFile(_))
    }
}
