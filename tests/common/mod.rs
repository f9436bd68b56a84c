//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dump_proxy::dump::MemorySink;
use dump_proxy::{HttpServer, ProxyConfig, Shutdown, Target};
use tokio::net::TcpListener;

/// A running proxy whose dumps are captured in memory.
#[allow(dead_code)]
pub struct TestProxy {
    pub addr: SocketAddr,
    pub sink: MemorySink,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Captured dump blocks as text.
    pub fn blocks(&self) -> Vec<String> {
        self.sink
            .blocks()
            .into_iter()
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .collect()
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Serve `router` as a mock upstream on an ephemeral port.
pub async fn start_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start a proxy in front of `target`.
#[allow(dead_code)]
pub async fn start_proxy(target: &str) -> TestProxy {
    let sink = MemorySink::new();
    let server = HttpServer::with_sink(
        &ProxyConfig::default(),
        Target::parse(target).unwrap(),
        Arc::new(sink.clone()),
    )
    .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestProxy { addr, sink, shutdown }
}

/// A port with nothing listening on it.
#[allow(dead_code)]
pub fn closed_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
