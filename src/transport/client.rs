//! Network transport backed by the hyper-util legacy client.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};

use crate::config::TimeoutConfig;
use crate::error::ProxyError;
use crate::transport::Transport;

/// Pooled HTTP/1.1 client used for the real upstream call.
///
/// Speaks plain HTTP or TLS depending on the request URI scheme.
#[derive(Debug, Clone)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl HyperTransport {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, rustls::Error> {
        let mut http = HttpConnector::new();
        http.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        // https URIs are handed to the TLS layer, not refused here.
        http.enforce_http(false);

        let connector = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(timeouts.pool_idle_secs))
            .pool_timer(TokioTimer::new())
            .build(connector);

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let response: Response<Incoming> = self.client.request(request).await?;
        Ok(response.map(Body::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_port() -> u16 {
        // Bind then drop to get a port nothing listens on.
        std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    #[tokio::test]
    async fn test_connection_refused_is_upstream_error() {
        let transport = HyperTransport::new(&TimeoutConfig::default()).unwrap();
        let request = Request::builder()
            .uri(format!("http://127.0.0.1:{}/", closed_port()))
            .body(Body::empty())
            .unwrap();

        let err = transport.round_trip(request).await.unwrap_err();
        assert!(matches!(err, ProxyError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_https_uri_reaches_the_network() {
        let transport = HyperTransport::new(&TimeoutConfig::default()).unwrap();
        let request = Request::builder()
            .uri(format!("https://127.0.0.1:{}/", closed_port()))
            .body(Body::empty())
            .unwrap();

        // A connect failure, not a scheme rejection.
        match transport.round_trip(request).await.unwrap_err() {
            ProxyError::Upstream(err) => assert!(err.is_connect(), "{:?}", err),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }
}
