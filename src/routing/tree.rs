//! Page tree compilation.
//!
//! # Responsibilities
//! - Walk the page graph once, from the root, through `Page::subpages`
//! - Assign every node its URL
//! - Cache capabilities and handler signatures per node
//! - Reject cycles, duplicate or malformed subpage names, bad signatures
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - Nodes live in an arena indexed by `NodeId`; the root is node 0
//! - The same page may be attached under two unrelated paths (two nodes),
//!   but never below itself

use std::sync::Arc;
use thiserror::Error;

use crate::page::{Capability, CapabilitySet, HandlerSignature, Page, SignatureError};

/// Index of a node inside a [`PageTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Errors raised while compiling the page tree.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("page at `{url}` is attached below itself as subpage `{name}`")]
    Cycle { url: String, name: String },

    #[error("page at `{url}` exposes subpage `{name}` more than once")]
    DuplicateSubpage { url: String, name: String },

    #[error("page at `{url}` has invalid subpage name `{name}`")]
    InvalidSubpageName { url: String, name: String },

    #[error("invalid {handler} signature on page at `{url}`: {source}")]
    Signature {
        url: String,
        handler: &'static str,
        #[source]
        source: SignatureError,
    },
}

/// A compiled page and everything the dispatcher needs about it.
pub struct PageNode {
    page: Arc<dyn Page>,
    url: String,
    capabilities: CapabilitySet,
    index_signature: Option<HandlerSignature>,
    action_signature: Option<HandlerSignature>,
    children: Vec<(String, NodeId)>,
}

impl PageNode {
    pub fn page(&self) -> &dyn Page {
        self.page.as_ref()
    }

    /// URL assigned at build time.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    pub fn index_signature(&self) -> Option<&HandlerSignature> {
        self.index_signature.as_ref()
    }

    pub fn action_signature(&self) -> Option<&HandlerSignature> {
        self.action_signature.as_ref()
    }

    pub fn children(&self) -> &[(String, NodeId)] {
        &self.children
    }

    /// Child attached under exactly `name`.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, id)| *id)
    }
}

impl std::fmt::Debug for PageNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageNode")
            .field("url", &self.url)
            .field("capabilities", &self.capabilities)
            .field("children", &self.children)
            .finish()
    }
}

/// Immutable tree of pages, built once at startup.
#[derive(Debug)]
pub struct PageTree {
    nodes: Vec<PageNode>,
}

impl PageTree {
    /// Compile the tree reachable from `root`.
    pub fn build(root: Arc<dyn Page>) -> Result<Self, TreeError> {
        let mut tree = Self { nodes: Vec::new() };
        let mut ancestors = Vec::new();
        tree.compile(root, "/".to_string(), &mut ancestors)?;

        tracing::debug!(pages = tree.nodes.len(), "Page tree compiled");
        Ok(tree)
    }

    /// Convenience for an owned root page.
    pub fn new<P: Page>(root: P) -> Result<Self, TreeError> {
        Self::build(Arc::new(root))
    }

    pub fn root(&self) -> &PageNode {
        self.node(NodeId::ROOT)
    }

    pub fn node(&self, id: NodeId) -> &PageNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node whose assigned URL is `url`.
    pub fn find(&self, url: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.url == url).map(NodeId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PageNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    fn compile(
        &mut self,
        page: Arc<dyn Page>,
        url: String,
        ancestors: &mut Vec<*const ()>,
    ) -> Result<NodeId, TreeError> {
        let index_signature = page.index_signature();
        let action_signature = page.action_signature();
        check_signature(&url, "index", index_signature.as_ref())?;
        check_signature(&url, "action", action_signature.as_ref())?;

        // Handler capabilities come from the signatures, not from the declaration.
        let mut capabilities: CapabilitySet = page
            .capabilities()
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Capability::UrlSetter | Capability::RequestSetter | Capability::CookieSetter
                )
            })
            .collect();
        if index_signature.is_some() {
            capabilities.insert(Capability::ReadHandler);
        }
        if action_signature.is_some() {
            capabilities.insert(Capability::WriteHandler);
        }

        let id = NodeId(self.nodes.len());
        let subpages = page.subpages();
        ancestors.push(page_addr(&page));
        self.nodes.push(PageNode {
            page,
            url: url.clone(),
            capabilities,
            index_signature,
            action_signature,
            children: Vec::with_capacity(subpages.len()),
        });

        tracing::trace!(url = %url, capabilities = ?capabilities, "Compiled page");

        let mut children: Vec<(String, NodeId)> = Vec::with_capacity(subpages.len());
        for subpage in subpages {
            if subpage.name.is_empty() || subpage.name.contains('/') {
                return Err(TreeError::InvalidSubpageName {
                    url,
                    name: subpage.name,
                });
            }
            if children.iter().any(|(name, _)| *name == subpage.name) {
                return Err(TreeError::DuplicateSubpage {
                    url,
                    name: subpage.name,
                });
            }
            if ancestors.contains(&page_addr(&subpage.page)) {
                return Err(TreeError::Cycle {
                    url,
                    name: subpage.name,
                });
            }

            let child_url = child_url(&url, &subpage.name);
            let child_id = self.compile(subpage.page, child_url, ancestors)?;
            children.push((subpage.name, child_id));
        }

        ancestors.pop();
        self.nodes[id.0].children = children;
        Ok(id)
    }
}

fn check_signature(
    url: &str,
    handler: &'static str,
    signature: Option<&HandlerSignature>,
) -> Result<(), TreeError> {
    match signature {
        Some(sig) => sig.validate().map_err(|source| TreeError::Signature {
            url: url.to_string(),
            handler,
            source,
        }),
        None => Ok(()),
    }
}

fn child_url(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

fn page_addr(page: &Arc<dyn Page>) -> *const () {
    Arc::as_ptr(page) as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Subpage;
    use std::sync::OnceLock;

    #[derive(Default)]
    struct TestPage {
        children: Vec<Subpage>,
        index: Option<HandlerSignature>,
        action: Option<HandlerSignature>,
        capabilities: CapabilitySet,
    }

    impl TestPage {
        fn readable() -> Self {
            Self {
                index: Some(HandlerSignature::new()),
                ..Self::default()
            }
        }

        fn child(mut self, name: &str, page: TestPage) -> Self {
            self.children.push(Subpage::new(name, Arc::new(page)));
            self
        }
    }

    impl Page for TestPage {
        fn capabilities(&self) -> CapabilitySet {
            self.capabilities
        }

        fn index_signature(&self) -> Option<HandlerSignature> {
            self.index.clone()
        }

        fn action_signature(&self) -> Option<HandlerSignature> {
            self.action.clone()
        }

        fn subpages(&self) -> Vec<Subpage> {
            self.children.clone()
        }
    }

    struct Looping {
        back: OnceLock<Arc<dyn Page>>,
    }

    impl Page for Looping {
        fn subpages(&self) -> Vec<Subpage> {
            self.back
                .get()
                .map(|page| vec![Subpage::new("again", page.clone())])
                .unwrap_or_default()
        }
    }

    #[test]
    fn test_assigned_urls() {
        let root = TestPage::readable()
            .child("sub", TestPage::readable().child("another", TestPage::readable()));
        let tree = PageTree::new(root).unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root().url(), "/");
        let sub = tree.root().child("sub").unwrap();
        assert_eq!(tree.node(sub).url(), "/sub");
        let another = tree.node(sub).child("another").unwrap();
        assert_eq!(tree.node(another).url(), "/sub/another");
        assert_eq!(tree.find("/sub/another"), Some(another));
    }

    #[test]
    fn test_handler_capabilities_derived_from_signatures() {
        let page = TestPage {
            action: Some(HandlerSignature::new()),
            // A declared handler capability without a signature is dropped.
            capabilities: CapabilitySet::new()
                .with(Capability::CookieSetter)
                .with(Capability::ReadHandler),
            ..TestPage::default()
        };
        let tree = PageTree::new(page).unwrap();
        let caps = tree.root().capabilities();

        assert!(caps.contains(Capability::CookieSetter));
        assert!(caps.contains(Capability::WriteHandler));
        assert!(!caps.contains(Capability::ReadHandler));
        assert!(!caps.contains(Capability::UrlSetter));
    }

    #[test]
    fn test_cycle_rejected() {
        let root = Arc::new(Looping {
            back: OnceLock::new(),
        });
        let _ = root.back.set(root.clone() as Arc<dyn Page>);

        let err = PageTree::build(root).unwrap_err();
        assert!(matches!(err, TreeError::Cycle { ref url, ref name } if url == "/" && name == "again"));
    }

    #[test]
    fn test_shared_page_on_two_paths_allowed() {
        let shared: Arc<dyn Page> = Arc::new(TestPage::readable());
        let root = TestPage {
            children: vec![
                Subpage::new("a", shared.clone()),
                Subpage::new("b", shared),
            ],
            ..TestPage::readable()
        };
        let tree = PageTree::new(root).unwrap();

        assert_eq!(tree.len(), 3);
        assert!(tree.find("/a").is_some());
        assert!(tree.find("/b").is_some());
    }

    #[test]
    fn test_duplicate_subpage_rejected() {
        let root = TestPage::readable()
            .child("sub", TestPage::readable())
            .child("sub", TestPage::readable());
        let err = PageTree::new(root).unwrap_err();
        assert!(matches!(err, TreeError::DuplicateSubpage { ref name, .. } if name == "sub"));
    }

    #[test]
    fn test_invalid_subpage_name_rejected() {
        let root = TestPage::readable().child("a/b", TestPage::readable());
        assert!(matches!(
            PageTree::new(root),
            Err(TreeError::InvalidSubpageName { .. })
        ));
    }

    #[test]
    fn test_bad_signature_rejected() {
        let page = TestPage {
            index: Some(HandlerSignature::new().mandatory("x").mandatory("x")),
            ..TestPage::default()
        };
        let err = PageTree::new(page).unwrap_err();
        assert!(matches!(err, TreeError::Signature { handler: "index", .. }));
        assert!(err.to_string().contains("`x`"));
    }
}
