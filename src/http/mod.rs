//! The HTTP/1.x wire-protocol engine.
//!
//! Components in dependency order: [`encoder`] serializes requests,
//! [`headreader`] pulls the raw header block off the socket, [`status`]
//! classifies status and header lines, [`body`] drains the body per the
//! negotiated framing, and [`gzip`] strips the gzip envelope from
//! content-encoded payloads.

pub mod body;
pub mod encoder;
pub mod gzip;
pub mod headers;
pub mod headreader;
pub mod request;
pub mod requestbody;
pub mod response;
pub mod status;

// Re-exports for convenience
pub use headers::Headers;
pub use request::{Method, Request, Version};
pub use requestbody::RequestBody;
pub use response::HttpResponse;
