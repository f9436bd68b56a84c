//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (port, target, log level)
//!     → validation.rs (semantic checks)
//!     → target.rs (resolve the upstream once)
//!     → ProxyConfig + Target, immutable for the process lifetime
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow running with no file at all
//! - Validation separates syntactic (serde) from semantic checks
//! - The target is resolved once at startup and injected, never re-read

pub mod loader;
pub mod schema;
pub mod target;
pub mod validation;

pub use schema::{DumpConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, TimeoutConfig};
pub use target::{Target, TargetError};
