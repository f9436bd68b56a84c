//! Error types shared across the proxy.
//!
//! Startup errors (`ConfigError`, `ServerError`) are fatal and end the
//! process. `ProxyError` is per request and is turned into a `502` by the
//! dispatcher.

use std::path::PathBuf;

use crate::config::target::TargetError;
use crate::config::validation::ValidationError;

/// Failure of a single proxied round trip.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The inbound request body could not be read.
    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    /// The upstream call failed (DNS, connect, protocol).
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// The upstream response body failed mid-stream.
    #[error("failed to read response body: {0}")]
    ResponseBody(#[source] axum::Error),
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("no upstream target given")]
    MissingTarget,
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error type for building and running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set up upstream TLS: {0}")]
    Tls(#[from] rustls::Error),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
