//! Response head parsing across interim-response chains and garbage input.

use rawhttp::base::deadline::Deadline;
use rawhttp::http::headreader::read_header_block;
use rawhttp::http::status::{build_headers, parse_header_block};
use rawhttp::NetError;

async fn parse_head(raw: &[u8]) -> Result<(u16, String, rawhttp::Headers), NetError> {
    let mut data = raw;
    let lines = read_header_block(&mut data, &Deadline::none()).await?;
    let block = parse_header_block(&lines)?;
    Ok((block.status, block.reason, build_headers(&block.header_lines)))
}

#[tokio::test]
async fn plain_response_head() {
    let (status, reason, headers) =
        parse_head(b"HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\n\r\n")
            .await
            .unwrap();
    assert_eq!(status, 404);
    assert_eq!(reason, "Not Found");
    assert_eq!(headers.get("Content-Type"), Some("text/html"));
}

#[tokio::test]
async fn continue_chain_keeps_only_the_final_block() {
    let raw = b"HTTP/1.1 100 Continue\r\n\
        X-Interim: dropped\r\n\
        HTTP/1.1 200 OK\r\n\
        Content-Length: 0\r\n\
        X-Final: kept\r\n\r\n";
    let (status, _, headers) = parse_head(raw).await.unwrap();
    assert_eq!(status, 200);
    assert!(!headers.contains("X-Interim"));
    assert_eq!(headers.get("X-Final"), Some("kept"));
}

#[tokio::test]
async fn no_status_line_carries_raw_bytes_verbatim() {
    let raw = b"this is not http at all\r\nbut it has line structure\r\n\r\n";
    let err = parse_head(raw).await.unwrap_err();
    match err {
        NetError::CanNotParseResponse { raw } => {
            assert_eq!(&raw[..], b"this is not http at all\r\nbut it has line structure");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_reason_phrase_is_empty() {
    let (status, reason, _) = parse_head(b"HTTP/1.1 204\r\n\r\n").await.unwrap();
    assert_eq!(status, 204);
    assert_eq!(reason, "");
}

#[tokio::test]
async fn header_values_with_colons_survive() {
    let (_, _, headers) =
        parse_head(b"HTTP/1.1 301 Moved\r\nLocation: https://example.com:8443/next\r\n\r\n")
            .await
            .unwrap();
    assert_eq!(headers.get("Location"), Some("https://example.com:8443/next"));
}
