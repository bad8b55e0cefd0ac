//! Connection establishment: DNS → TCP → TLS.
//!
//! The [`Connector`] trait is the seam between the engine and the real
//! network; [`NetConnector`] is the production implementation, and tests
//! substitute in-memory doubles to observe connection-open behavior.

use crate::base::neterror::NetError;
use crate::socket::pool::{Address, Scheme};
use crate::socket::stream::BoxedSocket;
use crate::socket::tls::TlsClientAuth;
use boring::ssl::{SslConnector, SslMethod, SslVerifyMode};
use std::future::Future;
use tokio::net::TcpStream;
use tracing::debug;

/// Resolves an address to an open duplex stream.
pub trait Connector: Send + Sync {
    fn connect(
        &self,
        addr: &Address,
        tls: Option<&TlsClientAuth>,
    ) -> impl Future<Output = Result<BoxedSocket, NetError>> + Send;
}

/// The real connector: DNS resolution, TCP connect, and a BoringSSL
/// handshake for https addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetConnector;

impl Connector for NetConnector {
    async fn connect(
        &self,
        addr: &Address,
        tls: Option<&TlsClientAuth>,
    ) -> Result<BoxedSocket, NetError> {
        let target = format!("{}:{}", addr.host, addr.port);
        let resolved = tokio::net::lookup_host(&target)
            .await
            .map_err(|e| NetError::connection(format!("resolving {} failed", addr.host), &e))?;

        let mut stream = None;
        let mut last_err = None;
        for candidate in resolved {
            match TcpStream::connect(candidate).await {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = Some(e),
            }
        }
        let stream = stream.ok_or_else(|| match last_err {
            Some(e) => NetError::connection(format!("connecting to {target} failed"), &e),
            None => NetError::ConnectionError {
                message: format!("{} did not resolve to any address", addr.host),
                code: None,
            },
        })?;
        debug!(address = %addr, "tcp connection established");

        if addr.scheme == Scheme::Https {
            let tls_stream = tls_handshake(addr, tls, stream).await?;
            debug!(address = %addr, "tls handshake complete");
            Ok(Box::new(tls_stream))
        } else {
            Ok(Box::new(stream))
        }
    }
}

async fn tls_handshake(
    addr: &Address,
    auth: Option<&TlsClientAuth>,
    stream: TcpStream,
) -> Result<tokio_boring::SslStream<TcpStream>, NetError> {
    let ssl_err = |e: boring::error::ErrorStack| NetError::ConnectionError {
        message: format!("tls configuration failed: {e}"),
        code: None,
    };

    let mut builder = SslConnector::builder(SslMethod::tls()).map_err(ssl_err)?;
    builder.set_alpn_protos(b"\x08http/1.1").map_err(ssl_err)?;
    // Peer validation is BoringSSL's job, not ours.
    builder.set_verify(SslVerifyMode::PEER);
    if let Some(auth) = auth {
        auth.apply_to_builder(&mut builder)?;
    }

    let config = builder.build().configure().map_err(ssl_err)?;
    tokio_boring::connect(config, &addr.host, stream).await.map_err(|e| {
        NetError::ConnectionError {
            message: format!("tls handshake with {} failed: {e:?}", addr.host),
            code: None,
        }
    })
}
