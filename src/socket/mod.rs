//! Connection establishment and reuse.
//!
//! - [`stream`]: the duplex socket abstraction (plain TCP or TLS)
//! - [`connectjob`]: DNS → TCP → TLS connection flow behind the
//!   [`connectjob::Connector`] seam
//! - [`pool`]: one reusable idle connection per `scheme://host:port`
//! - [`tls`]: per-address client-certificate material

pub mod connectjob;
pub mod pool;
pub mod stream;
pub mod tls;
