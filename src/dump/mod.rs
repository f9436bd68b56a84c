//! Exchange dumps.
//!
//! # Data Flow
//! ```text
//! request/response head + buffered body
//!     → printable.rs (may the body be shown as text?)
//!     → render.rs (wire-style text, body or BINARY placeholder)
//!     → render.rs (request + response joined into one block)
//!     → sink.rs (one atomic write per block)
//! ```

pub mod printable;
pub mod render;
pub mod sink;

pub use printable::{PrintableTypes, REGISTERED_PRINTABLE_TYPES};
pub use render::{dump_request, dump_response, exchange_block, BINARY_PLACEHOLDER, BLOCK_SEPARATOR};
pub use sink::{DumpSink, MemorySink, StdoutSink};
