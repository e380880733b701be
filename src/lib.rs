//! pagewalk: serve a tree of pages without a routing table.
//!
//! A request path is walked through named subpages from the root; leftover
//! segments bind to the target page's mandatory handler parameters and the
//! query string (or form body) binds its optional ones.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod page;
pub mod routing;
pub mod site;

pub use config::schema::ServerConfig;
pub use dispatch::Dispatcher;
pub use http::{DispatchRequest, DispatchResponse, HttpServer, Redirect, ResponseSignal};
pub use lifecycle::Shutdown;
pub use page::{Page, PageContext};
pub use routing::PageTree;
