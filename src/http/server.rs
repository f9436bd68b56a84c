//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the transport stack (hyper client → logging transport)
//! - Create the Axum router with a catch-all proxy handler
//! - Serve with client addresses attached and graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{ProxyConfig, Target};
use crate::dump::{DumpSink, PrintableTypes, StdoutSink};
use crate::error::ServerError;
use crate::http::dispatcher::ProxyDispatcher;
use crate::transport::{HyperTransport, LoggingTransport};

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    dispatcher: ProxyDispatcher,
}

impl HttpServer {
    /// Create a server that dumps exchanges to stdout.
    pub fn new(config: &ProxyConfig, target: Target) -> Result<Self, ServerError> {
        Self::with_sink(config, target, Arc::new(StdoutSink))
    }

    /// Create a server that dumps exchanges to `sink`.
    pub fn with_sink(
        config: &ProxyConfig,
        target: Target,
        sink: Arc<dyn DumpSink>,
    ) -> Result<Self, ServerError> {
        let printable = PrintableTypes::with_extra(config.dump.extra_printable_types.iter().cloned());
        let transport = LoggingTransport::new(
            HyperTransport::new(&config.timeouts)?,
            printable,
            target.label(),
            sink,
        );
        let dispatcher = ProxyDispatcher::new(target, Arc::new(transport));
        let router = Self::build_router(dispatcher.clone());

        Ok(Self { router, dispatcher })
    }

    fn build_router(dispatcher: ProxyDispatcher) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(dispatcher)
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for driving the proxy without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn target(&self) -> &Target {
        self.dispatcher.target()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            target_url = %self.dispatcher.target(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn proxy_handler(
    State(dispatcher): State<ProxyDispatcher>,
    request: Request<Body>,
) -> Response {
    dispatcher.dispatch(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::MemorySink;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_refused_upstream_yields_bad_gateway_without_dump() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let sink = MemorySink::new();
        let server = HttpServer::with_sink(
            &ProxyConfig::default(),
            Target::parse(&port.to_string()).unwrap(),
            Arc::new(sink.clone()),
        )
        .unwrap();

        for path in ["/", "/deep/path"] {
            let response = server
                .router()
                .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        }
        assert!(sink.blocks().is_empty());
    }

    #[tokio::test]
    async fn test_target_is_kept() {
        let server =
            HttpServer::new(&ProxyConfig::default(), Target::parse("9100").unwrap()).unwrap();
        assert_eq!(server.target().label(), "9100");
    }
}
