//! Raw response-header reading.
//!
//! Header length is unknown in advance, so the reader advances one byte at a
//! time and stops exactly at the `\r\n\r\n` terminator — it must never read
//! past the boundary into body bytes.

use crate::base::deadline::{read_bounded, Deadline};
use crate::base::neterror::NetError;
use bytes::Bytes;
use tokio::io::AsyncRead;

/// Read the raw header block up to and including the blank line, and split
/// it into `\r\n`-delimited lines (terminator excluded).
///
/// Every read is bounded by `deadline`; on timeout the connection is left in
/// an indeterminate state and must be discarded by the caller. EOF before
/// the terminator fails with [`NetError::CanNotParseResponse`] carrying
/// whatever bytes arrived.
pub async fn read_header_block<R>(
    conn: &mut R,
    deadline: &Deadline,
) -> Result<Vec<String>, NetError>
where
    R: AsyncRead + Unpin,
{
    let mut raw: Vec<u8> = Vec::with_capacity(512);
    let mut byte = [0u8; 1];
    loop {
        let n = read_bounded(conn, &mut byte, deadline).await?;
        if n == 0 {
            return Err(NetError::CanNotParseResponse { raw: Bytes::from(raw) });
        }
        raw.push(byte[0]);
        if raw.len() >= 4 && raw.ends_with(b"\r\n\r\n") {
            break;
        }
    }

    let block = &raw[..raw.len() - 4];
    if block.is_empty() {
        return Err(NetError::CanNotParseResponse { raw: Bytes::from(raw) });
    }
    let text = String::from_utf8_lossy(block);
    Ok(text.split("\r\n").map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn splits_lines_and_stops_at_terminator() {
        let mut data: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
        let lines = read_header_block(&mut data, &Deadline::none()).await.unwrap();
        assert_eq!(lines, vec!["HTTP/1.1 200 OK", "Content-Length: 5"]);
        // body bytes untouched
        assert_eq!(data, b"hello");
    }

    #[tokio::test]
    async fn eof_before_terminator_is_unparseable() {
        let mut data: &[u8] = b"HTTP/1.1 200 OK\r\nConte";
        let err = read_header_block(&mut data, &Deadline::none()).await.unwrap_err();
        match err {
            NetError::CanNotParseResponse { raw } => {
                assert_eq!(&raw[..], b"HTTP/1.1 200 OK\r\nConte");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn immediate_blank_line_is_unparseable() {
        let mut data: &[u8] = b"\r\n\r\n";
        let err = read_header_block(&mut data, &Deadline::none()).await.unwrap_err();
        assert!(matches!(err, NetError::CanNotParseResponse { .. }));
    }
}
