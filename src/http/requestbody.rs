//! Request body for methods that send data.

use bytes::Bytes;
use std::fmt;
use tokio::io::AsyncRead;

/// Body source attached to a request.
///
/// Either an in-memory byte sequence or a finite-length readable stream.
/// Stream bodies are consumed once; the declared length is what the
/// synthesized `Content-Length` reports.
#[derive(Default)]
pub enum RequestBody {
    /// No body (GET, HEAD, ...).
    #[default]
    Empty,
    /// In-memory bytes, written to the wire in one call.
    Bytes(Bytes),
    /// A readable stream of exactly `len` bytes, copied in bounded chunks.
    Stream {
        reader: Box<dyn AsyncRead + Send + Unpin>,
        len: u64,
    },
}

impl RequestBody {
    /// A streaming body with a declared length.
    pub fn stream(reader: impl AsyncRead + Send + Unpin + 'static, len: u64) -> Self {
        RequestBody::Stream { reader: Box::new(reader), len }
    }

    /// Declared size in bytes.
    pub fn len(&self) -> u64 {
        match self {
            RequestBody::Empty => 0,
            RequestBody::Bytes(b) => b.len() as u64,
            RequestBody::Stream { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("RequestBody::Empty"),
            RequestBody::Bytes(b) => write!(f, "RequestBody::Bytes({} bytes)", b.len()),
            RequestBody::Stream { len, .. } => write!(f, "RequestBody::Stream({len} bytes)"),
        }
    }
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        RequestBody::Bytes(Bytes::from(s))
    }
}

impl From<&str> for RequestBody {
    fn from(s: &str) -> Self {
        RequestBody::Bytes(Bytes::from(s.to_owned()))
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(v: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(v))
    }
}

impl From<Bytes> for RequestBody {
    fn from(b: Bytes) -> Self {
        RequestBody::Bytes(b)
    }
}
