//! Status-line and header-line classification.
//!
//! A server may send a chain of interim 1xx responses before the final
//! status (`100 Continue` being the common case). Each line matching the
//! status-line pattern opens a new block; only the last block survives.

use crate::base::neterror::NetError;
use crate::http::headers::Headers;
use crate::http::request::Version;
use bytes::Bytes;
use tracing::warn;

/// One status line plus the header lines that followed it.
#[derive(Debug)]
pub struct StatusBlock {
    pub version: Version,
    pub status: u16,
    pub reason: String,
    pub header_lines: Vec<String>,
}

/// Parse `HTTP/<version> <3-digit status> [<reason>]`.
///
/// Version is one of `1.0`, `1.1`, `2.0`, or bare `2`; an unrecognized
/// token falls back to 1.1 rather than rejecting the line. The status must
/// be three digits in `[100, 599]`; the reason may be absent.
fn parse_status_line(line: &str) -> Option<(Version, u16, String)> {
    let rest = line.strip_prefix("HTTP/")?;
    let (version_token, rest) = rest.split_once(char::is_whitespace)?;
    let version = match version_token {
        "1.0" => Version::Http10,
        "1.1" => Version::Http11,
        "2.0" | "2" => Version::Http20,
        _ => Version::Http11,
    };
    let rest = rest.trim_start();
    let (code_token, reason) = match rest.split_once(char::is_whitespace) {
        Some((code, reason)) => (code, reason.trim_start()),
        None => (rest, ""),
    };
    if code_token.len() != 3 {
        return None;
    }
    let status: u16 = code_token.parse().ok()?;
    if !(100..=599).contains(&status) {
        return None;
    }
    Some((version, status, reason.to_string()))
}

/// Classify each line as a status line or a header of the current block,
/// then keep only the final block of the chain.
///
/// Zero status-line matches means the response is unparseable; the raw
/// lines are carried in the error verbatim.
pub fn parse_header_block(lines: &[String]) -> Result<StatusBlock, NetError> {
    let mut blocks: Vec<StatusBlock> = Vec::new();
    for line in lines {
        if let Some((version, status, reason)) = parse_status_line(line) {
            blocks.push(StatusBlock { version, status, reason, header_lines: Vec::new() });
        } else if let Some(current) = blocks.last_mut() {
            current.header_lines.push(line.clone());
        }
        // Lines before any status line have no block to belong to.
    }
    blocks.pop().ok_or_else(|| NetError::CanNotParseResponse {
        raw: Bytes::from(lines.join("\r\n")),
    })
}

/// Turn the final block's header lines into a header multimap.
///
/// Each line splits on the first `:`, both sides trimmed. A line yielding an
/// empty name or value is dropped silently; this tolerates stray blank
/// continuation artifacts without failing the response.
pub fn build_headers(lines: &[String]) -> Headers {
    let mut headers = Headers::new();
    for line in lines {
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (line.trim(), ""),
        };
        if name.is_empty() || value.is_empty() {
            warn!(line = %line, "dropping malformed header line");
            continue;
        }
        headers.append(name, value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_block_keeps_its_headers() {
        let block = parse_header_block(&lines(&[
            "HTTP/1.1 200 OK",
            "Content-Type: text/html",
            "Content-Length: 5",
        ]))
        .unwrap();
        assert_eq!(block.status, 200);
        assert_eq!(block.reason, "OK");
        assert_eq!(block.version, Version::Http11);
        assert_eq!(block.header_lines.len(), 2);
    }

    #[test]
    fn interim_blocks_are_discarded() {
        let block = parse_header_block(&lines(&[
            "HTTP/1.1 100 Continue",
            "X-Interim: yes",
            "HTTP/1.1 101 Switching Protocols",
            "Upgrade: h2c",
            "HTTP/1.1 200 OK",
            "Content-Length: 0",
        ]))
        .unwrap();
        assert_eq!(block.status, 200);
        assert_eq!(block.header_lines, vec!["Content-Length: 0"]);
    }

    #[test]
    fn no_status_line_is_unparseable() {
        let err = parse_header_block(&lines(&["Content-Type: text/html", "X-Junk: 1"]))
            .unwrap_err();
        match err {
            NetError::CanNotParseResponse { raw } => {
                assert_eq!(&raw[..], b"Content-Type: text/html\r\nX-Junk: 1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_out_of_range_is_a_header_line() {
        assert!(parse_status_line("HTTP/1.1 600 Nope").is_none());
        assert!(parse_status_line("HTTP/1.1 099 Low").is_none());
        assert!(parse_status_line("HTTP/1.1 20 Short").is_none());
    }

    #[test]
    fn bare_2_version_and_missing_reason() {
        let (version, status, reason) = parse_status_line("HTTP/2 204").unwrap();
        assert_eq!(version, Version::Http20);
        assert_eq!(status, 204);
        assert_eq!(reason, "");
    }

    #[test]
    fn unknown_version_token_falls_back_to_1_1() {
        let (version, status, _) = parse_status_line("HTTP/9.9 200 OK").unwrap();
        assert_eq!(version, Version::Http11);
        assert_eq!(status, 200);
    }

    #[test]
    fn malformed_header_lines_are_dropped() {
        let headers = build_headers(&lines(&[
            "Content-Type: text/html",
            "no-colon-here",
            ": leading colon",
            "Empty-Value:   ",
            "X-Ok: 1",
        ]));
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Content-Type"), Some("text/html"));
        assert_eq!(headers.get("X-Ok"), Some("1"));
    }

    #[test]
    fn header_value_keeps_inner_colons() {
        let headers = build_headers(&lines(&["Location: http://example.com:8080/x"]));
        assert_eq!(headers.get("Location"), Some("http://example.com:8080/x"));
    }
}
