//! # rawhttp
//!
//! A minimal HTTP/1.x client built directly on raw sockets.
//!
//! `rawhttp` speaks HTTP/1.x on the wire itself: it serializes requests,
//! parses status lines and headers from the byte stream, and drains response
//! bodies per the negotiated framing (`Content-Length`, chunked
//! transfer-encoding, or connection-close), decompressing gzip payloads on
//! the fly. There is no dependency on a platform HTTP stack.
//!
//! ## Features
//!
//! - **Wire-level HTTP/1.x**: hand-rolled request encoding and response parsing
//! - **Body framing**: Content-Length, chunked, and connection-close strategies
//! - **gzip decoding**: streaming envelope strip + raw DEFLATE inflate
//! - **Keep-alive reuse**: one pooled connection per `scheme://host:port`
//! - **Deadline-bounded I/O**: every read is bounded by a per-request deadline
//! - **TLS**: BoringSSL transport with per-address client certificates
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rawhttp::{Client, Method, Request};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::new();
//!     let url = Url::parse("https://example.com/").unwrap();
//!     let response = client.send(Request::new(Method::Get, url)).await.unwrap();
//!     println!("Status: {}", response.status());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error taxonomy and deadline handling
//! - [`http`] - Request encoding, response parsing, body decoding
//! - [`socket`] - Connection establishment, pooling, and TLS
//! - [`client`] - High-level request API

pub mod base;
pub mod client;
pub mod http;
pub mod socket;

pub use base::deadline::Deadline;
pub use base::neterror::NetError;
pub use client::{Client, ClientBuilder};
pub use http::headers::Headers;
pub use http::request::{Method, Request, Version};
pub use http::requestbody::RequestBody;
pub use http::response::HttpResponse;
pub use socket::connectjob::{Connector, NetConnector};
pub use socket::pool::{Address, ConnectionPool, Scheme};
pub use socket::stream::{BoxedSocket, StreamSocket};
pub use socket::tls::TlsClientAuth;
