//! Outbound transports.
//!
//! # Data Flow
//! ```text
//! ProxyDispatcher (rewritten request)
//!     → logging.rs (buffer body, dump request)
//!     → client.rs (hyper-util pooled client, real network call)
//!     → logging.rs (buffer body, dump response, emit block)
//!     → back to ProxyDispatcher
//! ```
//!
//! # Design Decisions
//! - Transports hold no per-call state; everything per request is a local
//! - Errors are propagated unchanged, never retried

pub mod client;
pub mod logging;

use std::net::SocketAddr;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};

use crate::error::ProxyError;

pub use client::HyperTransport;
pub use logging::LoggingTransport;

/// Performs one request/response exchange with the upstream.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, ProxyError>;
}

/// Address of the inbound client, carried in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAddr(pub SocketAddr);
