//! The abstract request descriptor consumed by the encoder.

use crate::http::headers::Headers;
use crate::http::requestbody::RequestBody;
use std::fmt;
use url::Url;

/// The eight standard HTTP verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    Delete,
    #[default]
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol version rendered on the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    Http10,
    #[default]
    Http11,
    Http20,
}

impl Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "1.0",
            Version::Http11 => "1.1",
            Version::Http20 => "2.0",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An abstract HTTP request.
///
/// Constructed by the caller and consumed read-only by the encoder; any
/// synthesized headers (`Host`, `Content-Length`) are emitted on the wire
/// without being written back into this descriptor.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub version: Version,
    pub headers: Headers,
    pub body: RequestBody,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            version: Version::default(),
            headers: Headers::new(),
            body: RequestBody::Empty,
        }
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Set the protocol version (defaults to 1.1).
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }
}
