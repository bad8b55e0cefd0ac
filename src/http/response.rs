//! The response descriptor handed back to the caller.

use crate::http::headers::Headers;
use crate::http::request::Version;
use bytes::Bytes;
use std::borrow::Cow;

/// A fully-received HTTP response: final status, headers, and decoded body.
#[derive(Debug)]
pub struct HttpResponse {
    status: u16,
    reason: String,
    version: Version,
    headers: Headers,
    body: Bytes,
}

impl HttpResponse {
    pub(crate) fn new(
        status: u16,
        reason: String,
        version: Version,
        headers: Headers,
        body: Bytes,
    ) -> Self {
        Self { status, reason, version, headers, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase; may be empty.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Decoded body bytes (after any gzip stage).
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Take ownership of the body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Body as text, lossily replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
