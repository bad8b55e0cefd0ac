//! Request serialization: abstract request descriptor to wire bytes.
//!
//! Head encoding is pure (bytes in, bytes out, no I/O); the body is streamed
//! separately so arbitrarily large payloads never sit in memory whole.

use crate::base::neterror::NetError;
use crate::http::request::Request;
use crate::http::requestbody::RequestBody;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Copy granularity for streaming request bodies.
const BODY_CHUNK: usize = 4096;

/// Validate the request descriptor before any I/O.
///
/// Method and version are enums and cannot hold out-of-set values; the
/// checks left are the ones the type system cannot enforce.
pub fn validate(request: &Request) -> Result<(), NetError> {
    let host = request.url.host_str().unwrap_or("");
    if host.is_empty() {
        return Err(NetError::invalid_request("host is required"));
    }
    match request.url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(NetError::invalid_request(format!(
            "scheme may be http or https, got {other:?}"
        ))),
    }
}

/// Serialize the request line and headers, terminated by the blank line.
///
/// - request line: `METHOD SP absolute-URI SP HTTP/version CRLF`
/// - `Host` synthesized from the URL when the caller did not supply one
/// - every caller header emitted verbatim, one line per value
/// - `Content-Length` synthesized from a nonzero body size when absent;
///   a caller-supplied value is never overwritten
pub fn encode_head(request: &Request) -> Result<Vec<u8>, NetError> {
    validate(request)?;

    // Fragments are client-side only; they never go on the wire.
    let mut target = request.url.clone();
    target.set_fragment(None);

    let mut head = Vec::with_capacity(256);
    head.extend_from_slice(request.method.as_str().as_bytes());
    head.push(b' ');
    head.extend_from_slice(target.as_str().as_bytes());
    head.extend_from_slice(b" HTTP/");
    head.extend_from_slice(request.version.as_str().as_bytes());
    head.extend_from_slice(b"\r\n");

    if !request.headers.contains("Host") {
        let host = request.url.host_str().unwrap_or("");
        match request.url.port() {
            Some(port) => push_header(&mut head, "Host", &format!("{host}:{port}")),
            None => push_header(&mut head, "Host", host),
        }
    }

    for (name, value) in request.headers.iter() {
        push_header(&mut head, name, value);
    }

    let size = request.body.len();
    if size > 0 && !request.headers.contains("Content-Length") {
        push_header(&mut head, "Content-Length", &size.to_string());
    }

    head.extend_from_slice(b"\r\n");
    Ok(head)
}

fn push_header(head: &mut Vec<u8>, name: &str, value: &str) {
    head.extend_from_slice(name.as_bytes());
    head.extend_from_slice(b": ");
    head.extend_from_slice(value.as_bytes());
    head.extend_from_slice(b"\r\n");
}

/// Write the body to the wire after the head.
///
/// In-memory bodies go out in a single write; stream bodies are copied in
/// [`BODY_CHUNK`]-sized pieces up to the declared length.
pub(crate) async fn write_body<W>(writer: &mut W, body: &mut RequestBody) -> Result<(), NetError>
where
    W: AsyncWrite + Unpin,
{
    match body {
        RequestBody::Empty => Ok(()),
        RequestBody::Bytes(bytes) => writer
            .write_all(bytes)
            .await
            .map_err(|e| NetError::network(format!("socket write failed: {e}"))),
        RequestBody::Stream { reader, len } => copy_stream(reader.as_mut(), *len, writer).await,
    }
}

async fn copy_stream<R, W>(reader: &mut R, len: u64, writer: &mut W) -> Result<(), NetError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; BODY_CHUNK];
    let mut sent: u64 = 0;
    while sent < len {
        let want = (len - sent).min(BODY_CHUNK as u64) as usize;
        let n = reader
            .read(&mut buf[..want])
            .await
            .map_err(|e| NetError::network(format!("body read failed: {e}")))?;
        if n == 0 {
            return Err(NetError::network(format!(
                "body ended after {sent} of {len} declared bytes"
            )));
        }
        writer
            .write_all(&buf[..n])
            .await
            .map_err(|e| NetError::network(format!("socket write failed: {e}")))?;
        sent += n as u64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::Method;
    use url::Url;

    fn get(url: &str) -> Request {
        Request::new(Method::Get, Url::parse(url).unwrap())
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = encode_head(&get("ftp://example.com/")).unwrap_err();
        assert!(matches!(err, NetError::InvalidRequest { .. }));
    }

    #[test]
    fn synthesizes_host_with_explicit_port() {
        let head = encode_head(&get("http://example.com:8080/x")).unwrap();
        let text = String::from_utf8(head).unwrap();
        assert!(text.contains("Host: example.com:8080\r\n"));
    }

    #[test]
    fn caller_host_is_not_duplicated() {
        let req = get("http://example.com/").with_header("Host", "override.test");
        let text = String::from_utf8(encode_head(&req).unwrap()).unwrap();
        assert_eq!(text.matches("Host:").count(), 1);
        assert!(text.contains("Host: override.test\r\n"));
    }

    #[test]
    fn fragment_is_stripped_from_the_request_target() {
        let head = encode_head(&get("http://example.com/page?q=1#section")).unwrap();
        let text = String::from_utf8(head).unwrap();
        assert!(text.starts_with("GET http://example.com/page?q=1 HTTP/1.1\r\n"));
        assert!(!text.contains('#'));
    }

    #[test]
    fn head_ends_with_blank_line() {
        let head = encode_head(&get("http://example.com/")).unwrap();
        assert!(head.ends_with(b"\r\n\r\n"));
    }

    #[tokio::test]
    async fn stream_body_shorter_than_declared_fails() {
        let data: &[u8] = b"abc";
        let mut body = RequestBody::stream(data, 10);
        let mut out = Vec::new();
        let err = write_body(&mut out, &mut body).await.unwrap_err();
        assert!(matches!(err, NetError::NetworkError { .. }));
    }

    #[tokio::test]
    async fn stream_body_copies_declared_length() {
        let data: &[u8] = b"0123456789abcdef";
        let mut body = RequestBody::stream(data, 10);
        let mut out = Vec::new();
        write_body(&mut out, &mut body).await.unwrap();
        assert_eq!(out, b"0123456789");
    }
}
