//! Page tree walking.
//!
//! Follows named children from the root for as long as the next segment
//! names one; whatever is left becomes handler input.

use crate::routing::segment::RoutePath;
use crate::routing::tree::{NodeId, PageTree};

/// The deepest reachable node plus the segments it did not consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTarget<'p> {
    pub node: NodeId,
    pub remainder: &'p [String],
}

/// Walk `path` from the root of `tree`. Never fails.
pub fn walk<'p>(tree: &PageTree, path: &'p RoutePath) -> ResolvedTarget<'p> {
    let segments = path.segments();
    let mut current = NodeId::ROOT;
    let mut cursor = 0;

    while let Some(segment) = segments.get(cursor) {
        match tree.node(current).child(segment) {
            Some(next) => {
                current = next;
                cursor += 1;
            }
            None => break,
        }
    }

    ResolvedTarget {
        node: current,
        remainder: &segments[cursor..],
    }
}

impl PageTree {
    /// Resolve a path to a node and its unconsumed remainder.
    pub fn resolve<'p>(&self, path: &'p RoutePath) -> ResolvedTarget<'p> {
        walk(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{HandlerSignature, Page, Subpage};
    use std::sync::Arc;

    struct Named {
        children: Vec<Subpage>,
    }

    impl Named {
        fn leaf() -> Arc<dyn Page> {
            Arc::new(Named { children: vec![] })
        }

        fn with(children: Vec<(&str, Arc<dyn Page>)>) -> Arc<dyn Page> {
            Arc::new(Named {
                children: children
                    .into_iter()
                    .map(|(name, page)| Subpage::new(name, page))
                    .collect(),
            })
        }
    }

    impl Page for Named {
        fn index_signature(&self) -> Option<HandlerSignature> {
            Some(HandlerSignature::new())
        }

        fn subpages(&self) -> Vec<Subpage> {
            self.children.clone()
        }
    }

    fn sample_tree() -> PageTree {
        let another = Named::leaf();
        let sub = Named::with(vec![("another", another)]);
        let root = Named::with(vec![("sub", sub), ("other", Named::leaf())]);
        PageTree::build(root).unwrap()
    }

    #[test]
    fn test_every_reachable_path_resolves_exactly() {
        let tree = sample_tree();
        for (id, node) in tree.iter() {
            let path = RoutePath::parse(node.url());
            let target = tree.resolve(&path);
            assert_eq!(target.node, id, "path {}", node.url());
            assert!(target.remainder.is_empty());
        }
    }

    #[test]
    fn test_unmatched_first_segment_returns_root() {
        let tree = sample_tree();
        let path = RoutePath::parse("/nopage/x");
        let target = tree.resolve(&path);
        assert_eq!(target.node, NodeId::ROOT);
        assert_eq!(target.remainder, ["nopage", "x"]);
    }

    #[test]
    fn test_walk_stops_at_deepest_match() {
        let tree = sample_tree();
        let path = RoutePath::parse("/sub/3/another");
        let target = tree.resolve(&path);
        assert_eq!(tree.node(target.node).url(), "/sub");
        assert_eq!(target.remainder, ["3", "another"]);
    }

    #[test]
    fn test_remainder_is_suffix() {
        let tree = sample_tree();
        let path = RoutePath::parse("/sub/another/a/b");
        let target = tree.resolve(&path);
        let consumed = path.len() - target.remainder.len();
        assert_eq!(&path.segments()[consumed..], target.remainder);
        assert_eq!(tree.node(target.node).url(), "/sub/another");
    }
}
