//! Response body framing: drain exactly the body from the connection.
//!
//! Strategy selection, first match wins: Content-Length, chunked
//! transfer-encoding, connection-close, otherwise empty. Output flows
//! through a [`BodySink`] so gzip decompression stays streaming.

use crate::base::deadline::{read_bounded, Deadline};
use crate::base::neterror::NetError;
use crate::http::gzip::GzipStream;
use crate::http::headers::Headers;
use bytes::Bytes;
use tokio::io::AsyncRead;
use tracing::trace;

/// Read granularity for sized and close-delimited bodies.
const BODY_CHUNK: usize = 1024;

/// Collects body bytes, optionally routing them through the gzip stage.
pub struct BodySink {
    inflater: Option<GzipStream>,
    buf: Vec<u8>,
}

impl BodySink {
    pub fn new(gzip: bool) -> Self {
        Self {
            inflater: gzip.then(GzipStream::new),
            buf: Vec::new(),
        }
    }

    pub fn write(&mut self, chunk: &[u8]) -> Result<(), NetError> {
        match &mut self.inflater {
            Some(inflater) => {
                let produced = inflater.feed(chunk)?;
                self.buf.extend_from_slice(&produced);
            }
            None => self.buf.extend_from_slice(chunk),
        }
        Ok(())
    }

    pub fn finish(mut self) -> Bytes {
        if let Some(inflater) = self.inflater.take() {
            self.buf.extend_from_slice(&inflater.finish());
        }
        Bytes::from(self.buf)
    }
}

/// Drain the response body per the negotiated headers.
///
/// On timeout, bytes already written to the sink stay there — a half-read
/// stream is not recovered, the caller just sees the timeout error and a
/// short body. The connection must then be discarded, never reused.
pub async fn read_body<R>(
    conn: &mut R,
    headers: &Headers,
    deadline: &Deadline,
    sink: &mut BodySink,
) -> Result<(), NetError>
where
    R: AsyncRead + Unpin,
{
    deadline.check()?;

    let len = headers
        .get("Content-Length")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);
    let chunked = headers.contains_token("Transfer-Encoding", "chunked");
    let closed = headers.contains_token("Connection", "close");

    // Content-Length wins when both framing headers appear.
    if len > 0 {
        trace!(len, "draining body with content-length framing");
        read_sized(conn, len, deadline, sink).await
    } else if chunked {
        trace!("draining body with chunked framing");
        read_chunked(conn, deadline, sink).await
    } else if closed {
        trace!("draining body until connection close");
        read_to_close(conn, deadline, sink).await
    } else {
        trace!("response declares no body");
        Ok(())
    }
}

async fn read_sized<R>(
    conn: &mut R,
    len: u64,
    deadline: &Deadline,
    sink: &mut BodySink,
) -> Result<(), NetError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; BODY_CHUNK];
    let mut received: u64 = 0;
    while received < len {
        let want = (len - received).min(BODY_CHUNK as u64) as usize;
        let n = read_bounded(conn, &mut buf[..want], deadline).await?;
        if n == 0 {
            return Err(NetError::network(format!(
                "connection closed after {received} of {len} body bytes"
            )));
        }
        sink.write(&buf[..n])?;
        received += n as u64;
    }
    Ok(())
}

async fn read_chunked<R>(
    conn: &mut R,
    deadline: &Deadline,
    sink: &mut BodySink,
) -> Result<(), NetError>
where
    R: AsyncRead + Unpin,
{
    loop {
        deadline.check()?;
        let line = read_line(conn, deadline).await?;
        let size = parse_chunk_size(&line);
        if size == 0 {
            // Terminal chunk: its trailing CRLF is the first "line" here;
            // any trailer headers before the blank line are discarded.
            loop {
                let trailer = read_line(conn, deadline).await?;
                if trailer.is_empty() {
                    break;
                }
                trace!(trailer = %trailer, "discarding chunked trailer");
            }
            return Ok(());
        }

        let mut buf = [0u8; BODY_CHUNK];
        let mut remaining = size;
        while remaining > 0 {
            let want = remaining.min(BODY_CHUNK as u64) as usize;
            let n = read_bounded(conn, &mut buf[..want], deadline).await?;
            if n == 0 {
                return Err(NetError::network("connection closed mid-chunk"));
            }
            sink.write(&buf[..n])?;
            remaining -= n as u64;
        }

        // Mandatory CRLF after the chunk data.
        let sep = read_line(conn, deadline).await?;
        if !sep.is_empty() {
            return Err(NetError::network("missing CRLF after chunk data"));
        }
    }
}

async fn read_to_close<R>(
    conn: &mut R,
    deadline: &Deadline,
    sink: &mut BodySink,
) -> Result<(), NetError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; BODY_CHUNK];
    loop {
        let n = read_bounded(conn, &mut buf, deadline).await?;
        if n == 0 {
            return Ok(());
        }
        sink.write(&buf[..n])?;
    }
}

/// Read a line up to `\r\n` (stripped), one byte at a time.
async fn read_line<R>(conn: &mut R, deadline: &Deadline) -> Result<String, NetError>
where
    R: AsyncRead + Unpin,
{
    let mut line: Vec<u8> = Vec::with_capacity(16);
    let mut byte = [0u8; 1];
    loop {
        let n = read_bounded(conn, &mut byte, deadline).await?;
        if n == 0 {
            return Err(NetError::network("connection closed mid-line"));
        }
        line.push(byte[0]);
        if line.ends_with(b"\r\n") {
            line.truncate(line.len() - 2);
            return Ok(String::from_utf8_lossy(&line).into_owned());
        }
    }
}

/// Decode the hexadecimal chunk size, ignoring chunk extensions after `;`.
/// An unparseable size decodes as zero, terminating the body.
fn parse_chunk_size(line: &str) -> u64 {
    let size_token = line.split(';').next().unwrap_or("").trim();
    u64::from_str_radix(size_token, 16).unwrap_or(0)
}
