use bytes::Bytes;
use thiserror::Error;

/// Errors surfaced by the wire engine.
///
/// Every variant is terminal for the current request: nothing is retried
/// internally. The caller decides whether to retry, redirect, or give up.
#[derive(Debug, Error)]
pub enum NetError {
    /// The request descriptor violates the protocol grammar. Detected before
    /// any I/O happens.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The transport could not be established (DNS, TCP, or TLS failure).
    /// Carries the platform error code where one exists.
    #[error("connection error: {message}")]
    ConnectionError { message: String, code: Option<i32> },

    /// A blocking read exceeded the request deadline. The associated
    /// connection is poisoned and must not be reused.
    #[error("connection timeout")]
    ConnectionTimeout,

    /// The received byte stream does not contain a parseable status line and
    /// header block. Carries the raw bytes for inspection.
    #[error("can not parse response")]
    CanNotParseResponse { raw: Bytes },

    /// A lower-level transport failure mid-exchange (socket read/write error,
    /// premature close, corrupt content coding).
    #[error("network error: {message}")]
    NetworkError { message: String },
}

impl NetError {
    pub(crate) fn invalid_request(reason: impl Into<String>) -> Self {
        NetError::InvalidRequest { reason: reason.into() }
    }

    pub(crate) fn connection(message: impl Into<String>, err: &std::io::Error) -> Self {
        NetError::ConnectionError {
            message: format!("{}: {}", message.into(), err),
            code: err.raw_os_error(),
        }
    }

    pub(crate) fn network(message: impl Into<String>) -> Self {
        NetError::NetworkError { message: message.into() }
    }
}
