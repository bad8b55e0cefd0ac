//! Keep-alive connection reuse.
//!
//! The pool holds at most one idle socket per `scheme://host:port`. A
//! checkout removes the handle from the map, so a request in flight owns its
//! connection exclusively; the handle only comes back via [`ConnectionPool::checkin`]
//! after a fully-consumed keep-alive response.

use crate::base::neterror::NetError;
use crate::socket::connectjob::Connector;
use crate::socket::stream::BoxedSocket;
use crate::socket::tls::TlsClientAuth;
use dashmap::DashMap;
use std::fmt;
use tracing::debug;
use url::Url;

/// URL scheme the engine speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// Connection pool key: where a request physically goes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl Address {
    /// Derives the connection target from a request URL.
    pub fn from_url(url: &Url) -> Result<Self, NetError> {
        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(NetError::invalid_request(format!(
                    "invalid scheme {other}, it should be http or https"
                )))
            }
        };
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| NetError::invalid_request("host is required"))?
            .to_string();
        let port = url.port().unwrap_or_else(|| scheme.default_port());
        Ok(Self { scheme, host, port })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme.as_str(), self.host, self.port)
    }
}

/// One idle socket per address, plus registered client-certificate material.
#[derive(Default)]
pub struct ConnectionPool {
    idle: DashMap<Address, BoxedSocket>,
    tls_auth: DashMap<Address, TlsClientAuth>,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers client-certificate material for an address, replacing any
    /// previous registration.
    pub fn set_client_auth(&self, addr: Address, auth: TlsClientAuth) {
        debug!(address = %addr, "client certificate registered");
        self.tls_auth.insert(addr, auth);
    }

    /// Takes an idle connection for `addr`, or opens a fresh one.
    ///
    /// The returned handle is owned by the caller; it never comes back to
    /// the pool unless handed to [`checkin`](Self::checkin).
    pub async fn checkout<C: Connector>(
        &self,
        connector: &C,
        addr: &Address,
    ) -> Result<BoxedSocket, NetError> {
        if let Some((_, conn)) = self.idle.remove(addr) {
            if conn.is_connected() {
                debug!(address = %addr, "reusing idle connection");
                return Ok(conn);
            }
            debug!(address = %addr, "idle connection went stale, discarding");
        }
        let auth = self.tls_auth.get(addr).map(|a| a.clone());
        connector.connect(addr, auth.as_ref()).await
    }

    /// Returns a healthy keep-alive connection for reuse.
    pub fn checkin(&self, addr: Address, conn: BoxedSocket) {
        debug!(address = %addr, "connection parked for reuse");
        self.idle.insert(addr, conn);
    }

    /// Drops any idle connection for `addr`.
    pub fn evict(&self, addr: &Address) {
        if self.idle.remove(addr).is_some() {
            debug!(address = %addr, "idle connection evicted");
        }
    }

    /// Number of idle connections currently parked.
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::stream::StreamSocket;
    use tokio::io::DuplexStream;

    impl StreamSocket for DuplexStream {}

    fn socket() -> BoxedSocket {
        let (a, _b) = tokio::io::duplex(8);
        Box::new(a)
    }

    fn addr() -> Address {
        Address { scheme: Scheme::Http, host: "example.com".to_string(), port: 80 }
    }

    /// Never dials; checkout must be satisfied from the idle map or fail.
    struct NoDial;

    impl Connector for NoDial {
        async fn connect(
            &self,
            addr: &Address,
            _tls: Option<&TlsClientAuth>,
        ) -> Result<BoxedSocket, NetError> {
            Err(NetError::ConnectionError {
                message: format!("refusing to dial {addr}"),
                code: None,
            })
        }
    }

    #[tokio::test]
    async fn checkout_takes_the_idle_handle() {
        let pool = ConnectionPool::new();
        pool.checkin(addr(), socket());
        assert_eq!(pool.idle_count(), 1);
        let conn = pool.checkout(&NoDial, &addr()).await.unwrap();
        assert_eq!(pool.idle_count(), 0);
        drop(conn);
        // Not returned: the handle stays out of the pool unless checked in.
        assert_eq!(pool.idle_count(), 0);
    }

    #[tokio::test]
    async fn evict_discards_the_idle_handle() {
        let pool = ConnectionPool::new();
        pool.checkin(addr(), socket());
        pool.evict(&addr());
        assert_eq!(pool.idle_count(), 0);
        assert!(pool.checkout(&NoDial, &addr()).await.is_err());
    }

    #[test]
    fn address_from_url_with_defaults() {
        let url = Url::parse("http://example.com/path").unwrap();
        let addr = Address::from_url(&url).unwrap();
        assert_eq!(addr.scheme, Scheme::Http);
        assert_eq!(addr.host, "example.com");
        assert_eq!(addr.port, 80);

        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(Address::from_url(&url).unwrap().port, 443);
    }

    #[test]
    fn address_from_url_explicit_port() {
        let url = Url::parse("http://example.com:8080/").unwrap();
        let addr = Address::from_url(&url).unwrap();
        assert_eq!(addr.port, 8080);
        assert_eq!(addr.to_string(), "http://example.com:8080");
    }

    #[test]
    fn address_rejects_unknown_scheme() {
        let url = Url::parse("ftp://example.com/").unwrap();
        let err = Address::from_url(&url).unwrap_err();
        assert!(matches!(err, NetError::InvalidRequest { .. }));
    }
}
