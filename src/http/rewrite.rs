//! Reverse-proxy request rewriting.
//!
//! # Responsibilities
//! - Point the request URI at the target (scheme, authority, path, query)
//! - Set `Host` to the target authority
//! - Drop hop-by-hop headers in both directions
//! - Append the client IP to `X-Forwarded-For`

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{
    header::{CONNECTION, HOST, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE},
    HeaderMap, HeaderName, HeaderValue, Request, Uri, Version,
};

use crate::config::Target;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

const KEEP_ALIVE: &str = "keep-alive";
const PROXY_CONNECTION: &str = "proxy-connection";

/// Join two path segments with exactly one slash between them.
pub fn join_path(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

/// Combine target and request query strings.
pub fn join_query(target: Option<&str>, request: Option<&str>) -> Option<String> {
    match (target.filter(|q| !q.is_empty()), request.filter(|q| !q.is_empty())) {
        (Some(t), Some(r)) => Some(format!("{}&{}", t, r)),
        (Some(q), None) | (None, Some(q)) => Some(q.to_string()),
        (None, None) => None,
    }
}

/// The upstream URI for an inbound request URI.
pub fn upstream_uri(target: &Target, original: &Uri) -> Result<Uri, axum::http::Error> {
    let path = join_path(target.path(), original.path());
    let path_and_query = match join_query(target.query(), original.query()) {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };

    Uri::builder()
        .scheme(target.scheme().clone())
        .authority(target.authority().clone())
        .path_and_query(path_and_query)
        .build()
}

/// Remove hop-by-hop headers, including any named in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in listed {
        headers.remove(name);
    }

    for name in [CONNECTION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION] {
        headers.remove(name);
    }
    headers.remove(KEEP_ALIVE);
    headers.remove(PROXY_CONNECTION);
}

/// Append `ip` to `X-Forwarded-For`, folding earlier values into one header.
pub fn append_forwarded_for(headers: &mut HeaderMap, client: SocketAddr) -> Result<(), axum::http::Error> {
    let mut chain: Vec<String> = headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect();
    chain.push(client.ip().to_string());

    headers.insert(X_FORWARDED_FOR, HeaderValue::from_str(&chain.join(", "))?);
    Ok(())
}

/// Rewrite an inbound request in place so it targets the upstream.
pub fn rewrite_request(
    target: &Target,
    request: &mut Request<Body>,
    client: Option<SocketAddr>,
) -> Result<(), axum::http::Error> {
    *request.uri_mut() = upstream_uri(target, request.uri())?;
    *request.version_mut() = Version::HTTP_11;

    let headers = request.headers_mut();
    strip_hop_by_hop(headers);
    if let Some(client) = client {
        append_forwarded_for(headers, client)?;
    }
    headers.insert(HOST, HeaderValue::from_str(target.authority().as_str())?);
    Ok(())
}
