//! Root membership tracking shared by cooperating resolvers.

use dashmap::DashSet;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tracing::trace;
use xinfer_model::{DeclId, Element, LogicalContainerProvider};

/// Identity set of elements already claimed by some resolver.
///
/// Cloning yields another handle to the same set. Resolvers running on
/// different threads over disjoint roots may share one tracker; each element
/// is claimed at most once.
#[derive(Clone, Debug)]
pub struct RootedElements {
    elements: Arc<DashSet<Element, FxBuildHasher>>,
}

impl Default for RootedElements {
    fn default() -> Self {
        Self::new()
    }
}

impl RootedElements {
    pub fn new() -> Self {
        Self {
            elements: Arc::new(DashSet::with_hasher(FxBuildHasher)),
        }
    }

    /// Claim `element`. Returns `false` when it was already claimed.
    pub fn claim(&self, element: impl Into<Element>) -> bool {
        let element = element.into();
        let claimed = self.elements.insert(element);
        trace!(element = %element, claimed, "RootedElements::claim");
        claimed
    }

    pub fn contains(&self, element: impl Into<Element>) -> bool {
        self.elements.contains(&element.into())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether `element` lies in territory some resolver sharing this
    /// tracker has already claimed.
    ///
    /// Expressions are judged by their logical container; an expression
    /// outside any member is never handled.
    pub fn is_handled<P>(&self, provider: &P, element: Element) -> bool
    where
        P: LogicalContainerProvider + ?Sized,
    {
        match element {
            Element::Expr(_) => match provider.nearest_logical_container(element) {
                Some(container) => self.is_decl_handled(provider, container),
                None => false,
            },
            Element::Decl(decl) => self.is_decl_handled(provider, decl),
        }
    }

    fn is_decl_handled<P>(&self, provider: &P, decl: DeclId) -> bool
    where
        P: LogicalContainerProvider + ?Sized,
    {
        match provider.nearest_logical_container(Element::Decl(decl)) {
            Some(container) => self.contains(container),
            None => self.contains(decl),
        }
    }
}

#[cfg(test)]
#[path = "../tests/tracker_tests.rs"]
mod tests;
