//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route)
//!     → dispatcher.rs (single target)
//!     → rewrite.rs (URI, Host, hop-by-hop, X-Forwarded-For)
//!     → transport (logging + network)
//!     → dispatcher.rs (strip hop-by-hop, 502 on failure)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod rewrite;
pub mod server;

pub use dispatcher::ProxyDispatcher;
pub use server::HttpServer;
