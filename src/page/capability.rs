//! Page capabilities.
//!
//! A page declares which request-scoped values it wants injected; the tree
//! adds the handler capabilities it derives from the page's signatures. The
//! resulting set is computed once per node while the tree is built.

use std::fmt;

/// A single capability a page node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Receives its assigned URL.
    UrlSetter,
    /// Receives a read-only view of the current request.
    RequestSetter,
    /// Receives the request's cookie jar.
    CookieSetter,
    /// Has a read (`index`) handler.
    ReadHandler,
    /// Has a write (`action`) handler.
    WriteHandler,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::UrlSetter,
        Capability::RequestSetter,
        Capability::CookieSetter,
        Capability::ReadHandler,
        Capability::WriteHandler,
    ];

    fn bit(self) -> u8 {
        match self {
            Capability::UrlSetter => 1 << 0,
            Capability::RequestSetter => 1 << 1,
            Capability::CookieSetter => 1 << 2,
            Capability::ReadHandler => 1 << 3,
            Capability::WriteHandler => 1 << 4,
        }
    }
}

/// Small copyable set of [`Capability`] values.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet {
    bits: u8,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, capability: Capability) -> Self {
        self.insert(capability);
        self
    }

    pub fn insert(&mut self, capability: Capability) {
        self.bits |= capability.bit();
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.bits & capability.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
