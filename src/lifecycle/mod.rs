//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (binary):
//!     Load config → Validate → Compile page tree → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl-C → Shutdown::trigger → Stop accepting → Drain connections → Exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
