//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields, no string formatting)
//!     → tower_http TraceLayer spans (one per request, with x-request-id)
//!
//! logging.rs installs the subscriber that writes them to stdout.
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through all log lines of a request

pub mod logging;

pub use logging::init_logging;
