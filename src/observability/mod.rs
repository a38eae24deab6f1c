//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router transitions and host failures produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!
//! Consumers:
//!     → whatever subscriber / recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a metrics recorder; without one, updates are no-ops
//! - Logging initialization is offered for binaries, never called by the library

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
