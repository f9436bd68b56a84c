//! Transport wrapper that dumps every exchange it carries.
//!
//! Bodies are single-read streams, so both sides are buffered into `Bytes`
//! first. The dump renders from the buffer and a fresh body built from the
//! same buffer continues down (request) or up (response) the stack, so what
//! is printed is exactly what was sent and received.
//!
//! A failed round trip is not dumped. The error goes to the diagnostic log
//! and is returned unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};

use crate::dump::{dump_request, dump_response, exchange_block, DumpSink, PrintableTypes};
use crate::error::ProxyError;
use crate::transport::{ClientAddr, Transport};

/// Wraps a delegate transport and writes one dump block per exchange.
pub struct LoggingTransport<T> {
    inner: T,
    printable: PrintableTypes,
    target: String,
    sink: Arc<dyn DumpSink>,
}

impl<T: Transport> LoggingTransport<T> {
    /// `target` is the label printed in block headers.
    pub fn new(
        inner: T,
        printable: PrintableTypes,
        target: impl Into<String>,
        sink: Arc<dyn DumpSink>,
    ) -> Self {
        Self {
            inner,
            printable,
            target: target.into(),
            sink,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let client = request
            .extensions()
            .get::<ClientAddr>()
            .map(|ClientAddr(addr)| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let (parts, body) = request.into_parts();
        let body = to_bytes(body, usize::MAX)
            .await
            .map_err(ProxyError::RequestBody)?;
        let request_dump = dump_request(&parts, &body, self.printable.is_printable(&parts.headers));
        let request = Request::from_parts(parts, Body::from(body));

        let response = match self.inner.round_trip(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    client = %client,
                    upstream = %self.target,
                    error = %e,
                    "Round trip failed, exchange not dumped"
                );
                return Err(e);
            }
        };

        let (parts, body) = response.into_parts();
        let body = to_bytes(body, usize::MAX)
            .await
            .map_err(ProxyError::ResponseBody)?;
        let response_dump =
            dump_response(&parts, &body, self.printable.is_printable(&parts.headers));

        let block = exchange_block(&client, &self.target, &request_dump, &response_dump);
        if let Err(e) = self.sink.emit(&block) {
            tracing::error!(error = %e, "Failed to write exchange dump");
        }

        tracing::debug!(
            client = %client,
            status = %parts.status,
            request_bytes = request_dump.len(),
            response_bytes = body.len(),
            "Exchange dumped"
        );

        Ok(Response::from_parts(parts, Body::from(body)))
    }
}
