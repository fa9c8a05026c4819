//! Association lookups between declarations and expressions.

use crate::ids::{DeclId, Element, ExprId};
use crate::model::Model;
use serde::Serialize;
use xinfer_common::Span;
use xinfer_common::limits::MAX_TREE_WALK_ITERATIONS;

/// The source element a diagnostic about some model element points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SourceElement {
    pub element: Element,
    pub span: Span,
}

/// Links inferred declarations to the expressions they are inferred from.
pub trait LogicalContainerProvider {
    /// Body expression a member's type is computed from: field initializer,
    /// constructor or method body.
    fn associated_expression(&self, member: DeclId) -> Option<ExprId>;

    /// Nearest member owning `element`.
    ///
    /// For expressions this is the member whose body (or annotation value)
    /// contains it. Declarations are logical containers themselves and
    /// report `None`.
    fn nearest_logical_container(&self, element: Element) -> Option<DeclId>;

    /// Element diagnostics about `element` should be reported on.
    fn primary_source_element(&self, element: Element) -> SourceElement;
}

impl LogicalContainerProvider for Model {
    fn associated_expression(&self, member: DeclId) -> Option<ExprId> {
        self.decl(member).body()
    }

    fn nearest_logical_container(&self, element: Element) -> Option<DeclId> {
        let Element::Expr(expr) = element else {
            return None;
        };
        let mut current = expr;
        for _ in 0..MAX_TREE_WALK_ITERATIONS {
            let node = self.expr(current);
            match node.parent {
                Some(parent) => current = parent,
                None => return node.owner,
            }
        }
        None
    }

    fn primary_source_element(&self, element: Element) -> SourceElement {
        let span = match element {
            Element::Decl(decl) => self.decl(decl).span,
            Element::Expr(expr) => self.expr(expr).span,
        };
        SourceElement { element, span }
    }
}
