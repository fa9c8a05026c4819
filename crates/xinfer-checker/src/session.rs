//! Feature scope sessions.
//!
//! A session is the environment names in a body are resolved against: which
//! container `this` and `super` refer to, which types are visible statically
//! and whether the body runs in instance or static context.
//!
//! Sessions are persistent. Every `add_*` / `to_*` call returns a new session
//! wrapping the receiver, so a session handed to a nested computation can
//! never be changed by it.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use xinfer_model::DeclId;

/// Name `this` is bound under.
pub const THIS: &str = "this";
/// Name `super` is bound under.
pub const SUPER: &str = "super";

pub type LocalElements = IndexMap<Box<str>, DeclId, FxBuildHasher>;

#[derive(Debug)]
enum SessionKind {
    Root,
    Locals(LocalElements),
    StaticTypes(Vec<DeclId>),
    InstanceContext,
}

#[derive(Debug)]
struct SessionNode {
    parent: Option<FeatureScopeSession>,
    kind: SessionKind,
}

#[derive(Clone, Debug)]
pub struct FeatureScopeSession {
    node: Arc<SessionNode>,
}

impl Default for FeatureScopeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureScopeSession {
    /// Empty top-level session in static context.
    pub fn new() -> Self {
        Self {
            node: Arc::new(SessionNode {
                parent: None,
                kind: SessionKind::Root,
            }),
        }
    }

    fn wrap(&self, kind: SessionKind) -> Self {
        Self {
            node: Arc::new(SessionNode {
                parent: Some(self.clone()),
                kind,
            }),
        }
    }

    fn ancestors(&self) -> impl Iterator<Item = &SessionNode> {
        std::iter::successors(Some(&*self.node), |node| {
            node.parent.as_ref().map(|parent| &*parent.node)
        })
    }

    pub fn add_local_element(&self, name: &str, element: DeclId) -> Self {
        let mut locals = LocalElements::default();
        locals.insert(name.into(), element);
        self.wrap(SessionKind::Locals(locals))
    }

    pub fn add_local_elements(&self, elements: LocalElements) -> Self {
        if elements.is_empty() {
            return self.clone();
        }
        self.wrap(SessionKind::Locals(elements))
    }

    pub fn add_types_to_static_scope(&self, types: &[DeclId]) -> Self {
        if types.is_empty() {
            return self.clone();
        }
        self.wrap(SessionKind::StaticTypes(types.to_vec()))
    }

    /// Session for instance members. Idempotent.
    pub fn to_instance_context(&self) -> Self {
        if self.is_instance_context() {
            return self.clone();
        }
        self.wrap(SessionKind::InstanceContext)
    }

    pub fn is_instance_context(&self) -> bool {
        self.ancestors()
            .any(|node| matches!(node.kind, SessionKind::InstanceContext))
    }

    /// Innermost binding of `name`.
    pub fn local_element(&self, name: &str) -> Option<DeclId> {
        self.ancestors().find_map(|node| match &node.kind {
            SessionKind::Locals(locals) => locals.get(name).copied(),
            _ => None,
        })
    }

    /// Types in static scope, innermost first.
    pub fn static_types(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.ancestors()
            .flat_map(|node| match &node.kind {
                SessionKind::StaticTypes(types) => types.as_slice(),
                _ => [].as_slice(),
            })
            .copied()
    }

    pub fn is_visible_static_type(&self, ty: DeclId) -> bool {
        self.static_types().any(|visible| visible == ty)
    }
}

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod tests;
