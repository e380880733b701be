//! Page model.
//!
//! # Data Flow
//! ```text
//! Page author code
//!     → Page trait (handlers, signatures, subpages, capabilities)
//!     → routing::tree compiles the page graph once at startup
//!     → dispatch injects a PageContext and invokes index/action
//! ```
//!
//! # Design Decisions
//! - Pages are plain values behind `Arc<dyn Page>`; handlers take `&self`
//! - Any state a page keeps across requests is the page's own business,
//!   the engine never locks pages
//! - Handlers return signals (`ResponseSignal`), faults are `Err`

pub mod capability;
pub mod context;
pub mod signature;

use std::sync::Arc;
use thiserror::Error;

use crate::http::ResponseSignal;

pub use capability::{Capability, CapabilitySet};
pub use context::PageContext;
pub use signature::{BoundArgs, HandlerSignature, OptionalParam, SignatureError};

/// Result of invoking a handler.
pub type HandlerResult = Result<ResponseSignal, HandlerFault>;

/// Unexpected failure inside a handler. Surfaces as a 500.
#[derive(Debug, Error)]
#[error("handler fault: {message}")]
pub struct HandlerFault {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HandlerFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error.
    pub fn from_error<E>(message: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(error)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A named child attached to a page.
#[derive(Clone)]
pub struct Subpage {
    pub name: String,
    pub page: Arc<dyn Page>,
}

impl Subpage {
    pub fn new(name: impl Into<String>, page: Arc<dyn Page>) -> Self {
        Self {
            name: name.into(),
            page,
        }
    }
}

impl std::fmt::Debug for Subpage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subpage").field("name", &self.name).finish()
    }
}

/// A routable unit of behavior.
///
/// Every method has a default, so a page implements only what it exposes.
/// A handler is present when its signature method returns `Some`.
pub trait Page: Send + Sync + 'static {
    /// Context values this page wants injected before its handlers run.
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new()
    }

    /// Signature of the read handler, if the page has one.
    fn index_signature(&self) -> Option<HandlerSignature> {
        None
    }

    /// Read handler, invoked on safe verbs.
    fn index(&self, _ctx: &mut PageContext<'_>, _args: &BoundArgs) -> HandlerResult {
        Ok(ResponseSignal::NotFound)
    }

    /// Signature of the write handler, if the page has one.
    fn action_signature(&self) -> Option<HandlerSignature> {
        None
    }

    /// Write handler, invoked on POST. A `Rendered` return is ignored in
    /// favor of the redirect-after-action default.
    fn action(&self, _ctx: &mut PageContext<'_>, _args: &BoundArgs) -> HandlerResult {
        Ok(ResponseSignal::NotFound)
    }

    /// Named children of this page.
    fn subpages(&self) -> Vec<Subpage> {
        Vec::new()
    }
}
