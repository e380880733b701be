//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! DispatchRequest
//!     → routing (segment path, walk tree)      → ResolvedTarget
//!     → injector.rs (context for the node)     → PageContext
//!     → binder.rs (select handler, bind args)  → Binding | NotFound
//!     → coordinator.rs (invoke, settle)        → DispatchResponse | HandlerFault
//! ```
//!
//! # Design Decisions
//! - One attempt per request, nothing is retried
//! - No locks: the tree is immutable, request state is fresh per request
//! - Synchronous; the transport decides where it runs

pub mod binder;
pub mod coordinator;
pub mod injector;

use std::sync::Arc;

use crate::http::{CookieJar, DispatchRequest, DispatchResponse};
use crate::page::HandlerFault;
use crate::routing::{PageTree, RoutePath};

pub use binder::{Binding, HandlerKind, NotFound};
pub use coordinator::Settled;

/// Routes requests through a page tree. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tree: Arc<PageTree>,
}

impl Dispatcher {
    pub fn new(tree: PageTree) -> Self {
        Self {
            tree: Arc::new(tree),
        }
    }

    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    /// Dispatch one request. `Err` means the handler faulted; the transport
    /// answers 500.
    pub fn dispatch(&self, request: DispatchRequest) -> Result<DispatchResponse, HandlerFault> {
        let path = RoutePath::parse(request.path());
        let mut cookies = CookieJar::from_headers(request.headers());
        let view = request.into_view();
        let requested_url = view.url();

        let target = self.tree.resolve(&path);
        let node = self.tree.node(target.node);

        tracing::debug!(
            method = %view.method(),
            url = %requested_url,
            page = %node.url(),
            remainder = target.remainder.len(),
            "Resolved page"
        );

        let settled = {
            let mut ctx = injector::inject(node, &view, &mut cookies);
            match binder::bind_request(node, target.remainder, &view) {
                Ok(binding) => {
                    tracing::debug!(handler = binding.kind.name(), page = %node.url(), "Invoking handler");
                    let result = coordinator::invoke(node, binding.kind, &mut ctx, &binding.args);
                    coordinator::settle(binding.kind, result)
                }
                Err(reason) => {
                    tracing::warn!(url = %requested_url, page = %node.url(), reason = %reason, "No handler bound");
                    Settled::NotFound
                }
            }
        };

        coordinator::respond(settled, &requested_url, &cookies)
    }
}
