//! Single-target HTTP reverse proxy that dumps every exchange to stdout.

// Core subsystems
pub mod config;
pub mod dump;
pub mod http;
pub mod net;
pub mod transport;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::{ProxyConfig, Target};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
