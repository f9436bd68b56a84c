//! Textual rendering of request/response snapshots.
//!
//! Dumps use HTTP/1.x wire layout: start line, `Host` first for requests,
//! remaining headers sorted by canonical name, a blank line, then the body
//! bytes unchanged or the `BINARY` placeholder.

use axum::http::{header::HOST, request, response, HeaderMap, HeaderName, HeaderValue};

/// Written in place of a body that is not printable.
pub const BINARY_PLACEHOLDER: &[u8] = b"BINARY\n\n";

/// Separator opening every exchange block.
pub const BLOCK_SEPARATOR: &str = "\n---\n\n";

const CRLF: &[u8] = b"\r\n";

/// Canonical MIME-style header name: `content-type` → `Content-Type`.
pub fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Render an outgoing request.
pub fn dump_request(parts: &request::Parts, body: &[u8], printable: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(256 + body.len());

    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    out.extend_from_slice(format!("{} {} {:?}", parts.method, path, parts.version).as_bytes());
    out.extend_from_slice(CRLF);

    let host = parts
        .headers
        .get(HOST)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .or_else(|| parts.uri.authority().map(|a| a.to_string()));
    if let Some(host) = host {
        out.extend_from_slice(format!("Host: {}", host).as_bytes());
        out.extend_from_slice(CRLF);
    }

    write_headers(&mut out, &parts.headers, Some(&HOST));
    out.extend_from_slice(CRLF);
    write_body(&mut out, body, printable);
    out
}

/// Render an incoming response.
pub fn dump_response(parts: &response::Parts, body: &[u8], printable: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(256 + body.len());

    let status = format!(
        "{:?} {} {}",
        parts.version,
        parts.status.as_str(),
        parts.status.canonical_reason().unwrap_or("")
    );
    out.extend_from_slice(status.trim_end().as_bytes());
    out.extend_from_slice(CRLF);

    write_headers(&mut out, &parts.headers, None);
    out.extend_from_slice(CRLF);
    write_body(&mut out, body, printable);
    out
}

/// Assemble one exchange block from its two dumps.
pub fn exchange_block(client: &str, target: &str, request: &[u8], response: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(64 + request.len() + response.len());
    out.extend_from_slice(BLOCK_SEPARATOR.as_bytes());
    out.extend_from_slice(format!("{} > {}:\n", client, target).as_bytes());
    out.extend_from_slice(request);
    out.extend_from_slice(format!("{} < {}:\n", target, client).as_bytes());
    out.extend_from_slice(response);
    out.push(b'\n');
    out
}

fn write_headers(out: &mut Vec<u8>, headers: &HeaderMap, skip: Option<&HeaderName>) {
    let mut lines: Vec<(String, &HeaderValue)> = headers
        .iter()
        .filter(|(name, _)| Some(*name) != skip)
        .map(|(name, value)| (canonical_header_name(name.as_str()), value))
        .collect();
    // Stable: repeated headers keep their order.
    lines.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, value) in lines {
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(CRLF);
    }
}

/// Printable bodies are written as-is.
fn write_body(out: &mut Vec<u8>, body: &[u8], printable: bool) {
    if printable {
        out.extend_from_slice(body);
    } else {
        out.extend_from_slice(BINARY_PLACEHOLDER);
    }
}
