//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → segment.rs (split into RoutePath)
//!     → walker.rs (follow named children from the root)
//!     → Return: ResolvedTarget (node + unconsumed segments)
//!
//! Tree compilation (at startup):
//!     root page
//!     → tree.rs (walk Page::subpages, assign URLs, cache capabilities)
//!     → reject cycles and ambiguous names
//!     → Freeze as immutable PageTree
//! ```
//!
//! # Design Decisions
//! - Tree compiled at startup, immutable at runtime
//! - Exact-name child matching, no patterns
//! - Walking never fails; leftover segments are binding input

pub mod segment;
pub mod tree;
pub mod walker;

pub use segment::RoutePath;
pub use tree::{NodeId, PageNode, PageTree, TreeError};
pub use walker::{walk, ResolvedTarget};
