//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig
//!     → listener.rs (bind, report bound address)
//!     → Hand off to HTTP layer (axum::serve, one task per connection)
//! ```

pub mod listener;

pub use listener::bind;
