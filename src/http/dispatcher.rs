//! Single-target request dispatch.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::Target;
use crate::http::rewrite::{rewrite_request, strip_hop_by_hop};
use crate::observability::metrics;
use crate::transport::{ClientAddr, Transport};

/// Forwards every request to the one configured target.
#[derive(Clone)]
pub struct ProxyDispatcher {
    target: Arc<Target>,
    transport: Arc<dyn Transport>,
}

impl ProxyDispatcher {
    pub fn new(target: Target, transport: Arc<dyn Transport>) -> Self {
        Self {
            target: Arc::new(target),
            transport,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Rewrite, forward and return the upstream response.
    ///
    /// Transport failures become `502 Bad Gateway`.
    pub async fn dispatch(&self, mut request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let method = request.method().clone();
        let client = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        tracing::debug!(
            method = %method,
            uri = %request.uri(),
            client = ?client,
            "Proxying request"
        );

        if let Err(e) = rewrite_request(&self.target, &mut request, client) {
            tracing::warn!(uri = %request.uri(), error = %e, "Cannot rewrite request");
            metrics::record_request(method.as_str(), 400, start_time);
            return (StatusCode::BAD_REQUEST, "Invalid request target").into_response();
        }
        if let Some(addr) = client {
            request.extensions_mut().insert(ClientAddr(addr));
        }

        match self.transport.round_trip(request).await {
            Ok(mut response) => {
                strip_hop_by_hop(response.headers_mut());
                metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
                response
            }
            Err(e) => {
                tracing::error!(
                    target_url = %self.target,
                    client = ?client,
                    error = %e,
                    "Upstream error"
                );
                metrics::record_upstream_error();
                metrics::record_request(method.as_str(), 502, start_time);
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProxyError;
    use async_trait::async_trait;
    use axum::http::header::{HOST, TRANSFER_ENCODING};
    use axum::http::{Uri, HeaderMap};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(Uri, HeaderMap, Option<ClientAddr>)>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
            self.seen.lock().unwrap().push((
                request.uri().clone(),
                request.headers().clone(),
                request.extensions().get::<ClientAddr>().copied(),
            ));
            Ok(Response::builder()
                .header(TRANSFER_ENCODING, "chunked")
                .header("x-upstream", "1")
                .body(Body::from("ok"))
                .unwrap())
        }
    }

    struct Refused;

    #[async_trait]
    impl Transport for Refused {
        async fn round_trip(&self, _request: Request<Body>) -> Result<Response<Body>, ProxyError> {
            Err(ProxyError::ResponseBody(axum::Error::new("refused")))
        }
    }

    #[tokio::test]
    async fn test_dispatch_rewrites_and_forwards() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = ProxyDispatcher::new(
            Target::parse("http://127.0.0.1:9000/v1").unwrap(),
            recorder.clone(),
        );

        let mut request = Request::builder()
            .uri("/foo?x=1")
            .header(HOST, "proxy:8080")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("192.168.1.9:40000".parse().unwrap()));

        let response = dispatcher.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(TRANSFER_ENCODING).is_none());
        assert_eq!(response.headers()["x-upstream"], "1");

        let seen = recorder.seen.lock().unwrap();
        let (uri, headers, client) = &seen[0];
        assert_eq!(uri.to_string(), "http://127.0.0.1:9000/v1/foo?x=1");
        assert_eq!(headers[HOST], "127.0.0.1:9000");
        assert_eq!(headers["x-forwarded-for"], "192.168.1.9");
        assert_eq!(client.map(|c| c.0.port()), Some(40000));
    }

    #[tokio::test]
    async fn test_transport_error_is_bad_gateway() {
        let dispatcher = ProxyDispatcher::new(Target::parse("9").unwrap(), Arc::new(Refused));

        for _ in 0..2 {
            let request = Request::builder().uri("/").body(Body::empty()).unwrap();
            let response = dispatcher.dispatch(request).await;
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        }
    }
}
