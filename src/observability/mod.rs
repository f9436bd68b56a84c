//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (diagnostic events, stderr)
//!     → metrics.rs (counters, histograms)
//!
//! Exchange dumps are not diagnostics: they go through dump::sink to stdout.
//! ```

pub mod logging;
pub mod metrics;
