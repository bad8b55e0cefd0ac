//! The high-level request API.
//!
//! A [`Client`] owns the connection pool and per-request policy (timeout,
//! default headers, client certificates) and drives the whole exchange:
//! encode, connect, write, parse, drain, and decide the connection's fate.

use crate::base::deadline::Deadline;
use crate::base::neterror::NetError;
use crate::http::body::{read_body, BodySink};
use crate::http::encoder;
use crate::http::headreader::read_header_block;
use crate::http::request::Request;
use crate::http::response::HttpResponse;
use crate::http::status::{build_headers, parse_header_block};
use crate::socket::connectjob::{Connector, NetConnector};
use crate::socket::pool::{Address, ConnectionPool};
use crate::socket::stream::BoxedSocket;
use crate::socket::tls::TlsClientAuth;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client with keep-alive pooling and deadline-bounded I/O.
///
/// Cheap to share via the pool being behind an [`Arc`]; construct once and
/// reuse across requests to benefit from connection reuse.
pub struct Client<C: Connector = NetConnector> {
    pool: Arc<ConnectionPool>,
    connector: C,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
}

impl Client<NetConnector> {
    /// A client with the default policy: 60 second timeout, standard
    /// default headers, real network connector.
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl Default for Client<NetConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> Client<C> {
    /// The connection pool backing this client.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Perform one full request/response exchange.
    ///
    /// On success the connection is parked for reuse unless the response
    /// carried `Connection: close`. On any error, including timeout, the
    /// connection is dropped; a partially-drained socket must never serve
    /// another request.
    pub async fn send(&self, request: Request) -> Result<HttpResponse, NetError> {
        let mut request = request;
        for (name, value) in &self.default_headers {
            if !request.headers.contains(name) {
                request.headers.append(name.clone(), value.clone());
            }
        }

        let addr = Address::from_url(&request.url)?;
        let head = encoder::encode_head(&request)?;
        let deadline = Deadline::after(self.timeout);

        let mut conn = self.pool.checkout(&self.connector, &addr).await?;
        let result = self.exchange(&mut conn, &mut request, &head, &deadline).await;

        match result {
            Ok((response, keep_alive)) => {
                if keep_alive {
                    self.pool.checkin(addr, conn);
                } else {
                    debug!(address = %addr, "closing connection per response header");
                    drop(conn);
                }
                Ok(response)
            }
            Err(e) => {
                // The socket may hold unread response bytes; never reuse it.
                debug!(address = %addr, error = %e, "dropping connection after failed exchange");
                drop(conn);
                Err(e)
            }
        }
    }

    async fn exchange(
        &self,
        conn: &mut BoxedSocket,
        request: &mut Request,
        head: &[u8],
        deadline: &Deadline,
    ) -> Result<(HttpResponse, bool), NetError> {
        conn.write_all(head)
            .await
            .map_err(|e| NetError::network(format!("socket write failed: {e}")))?;
        encoder::write_body(conn, &mut request.body).await?;
        conn.flush()
            .await
            .map_err(|e| NetError::network(format!("socket flush failed: {e}")))?;
        debug!(method = %request.method, url = %request.url, "request written");

        let lines = read_header_block(conn, deadline).await?;
        let block = parse_header_block(&lines)?;
        let headers = build_headers(&block.header_lines);
        debug!(status = block.status, "response head parsed");

        let gzip = headers.contains_token("Content-Encoding", "gzip");
        let keep_alive = !headers.contains_token("Connection", "close");

        let mut sink = BodySink::new(gzip);
        read_body(conn, &headers, deadline, &mut sink).await?;
        let body = sink.finish();

        let response = HttpResponse::new(block.status, block.reason, block.version, headers, body);
        Ok((response, keep_alive))
    }
}

/// Configures and builds a [`Client`].
pub struct ClientBuilder {
    timeout: Duration,
    default_headers: Vec<(String, String)>,
    tls_auth: Vec<(Address, TlsClientAuth)>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            default_headers: vec![
                (
                    "User-Agent".to_string(),
                    concat!("rawhttp/", env!("CARGO_PKG_VERSION")).to_string(),
                ),
                ("Accept-Encoding".to_string(), "gzip".to_string()),
            ],
            tls_auth: Vec::new(),
        }
    }

    /// Per-request timeout; `Duration::ZERO` disables the deadline entirely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header applied to every request that does not already carry it.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Drop the built-in default headers (`User-Agent`, `Accept-Encoding`).
    pub fn no_default_headers(mut self) -> Self {
        self.default_headers.clear();
        self
    }

    /// Register a client certificate for one address.
    pub fn client_auth(mut self, addr: Address, auth: TlsClientAuth) -> Self {
        self.tls_auth.push((addr, auth));
        self
    }

    pub fn build(self) -> Client<NetConnector> {
        self.build_with_connector(NetConnector)
    }

    /// Build with a custom [`Connector`], the seam tests use to substitute
    /// in-memory transports.
    pub fn build_with_connector<C: Connector>(self, connector: C) -> Client<C> {
        let pool = Arc::new(ConnectionPool::new());
        for (addr, auth) in self.tls_auth {
            pool.set_client_auth(addr, auth);
        }
        Client {
            pool,
            connector,
            timeout: self.timeout,
            default_headers: self.default_headers,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
