//! Socket abstraction for polymorphic connection handling.
//!
//! [`StreamSocket`] lets the engine treat plain TCP and TLS-wrapped sockets
//! uniformly, and gives tests a seam to substitute in-memory streams.

use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_boring::SslStream;

/// Any duplex byte stream usable as an HTTP connection.
pub trait StreamSocket: AsyncRead + AsyncWrite + Unpin + Send {
    /// Non-blocking liveness check consulted before reusing an idle handle.
    fn is_connected(&self) -> bool {
        true
    }
}

/// An owned connection handle.
pub type BoxedSocket = Box<dyn StreamSocket>;

impl StreamSocket for TcpStream {
    fn is_connected(&self) -> bool {
        check_tcp_connected(self)
    }
}

impl StreamSocket for SslStream<TcpStream> {
    fn is_connected(&self) -> bool {
        check_tcp_connected(self.get_ref())
    }
}

/// Lightweight liveness probe on the underlying TCP socket.
///
/// Catches FIN/RST on idle keep-alive connections; an idle handle has no
/// pending application data, so a successful read here means the server
/// spoke out of turn and the handle is unusable anyway.
fn check_tcp_connected(stream: &TcpStream) -> bool {
    if stream.peer_addr().is_err() {
        return false;
    }
    let mut buf = [0u8; 1];
    match stream.try_read(&mut buf) {
        Ok(0) => false,                                          // EOF
        Ok(_) => false,                                          // unexpected data
        Err(ref e) if e.kind() == ErrorKind::WouldBlock => true, // idle, connected
        Err(_) => false,
    }
}
