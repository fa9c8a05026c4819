//! The model arena.

use crate::decl::{Declaration, TypeParamDecl};
use crate::error::ModelError;
use crate::expr::Expression;
use crate::ids::{DeclId, ExprId, TypeParamId};
use crate::intern::TypeInterner;
use crate::types::TypeId;
use tracing::debug;

/// Immutable declaration/expression arena plus the type interner.
///
/// The only mutation after construction is writing resolved types into
/// inferred type slots (see [`Model::resolve_inferred`]), which is safe to
/// do concurrently: each slot is write-once.
pub struct Model {
    pub(crate) decls: Vec<Declaration>,
    pub(crate) exprs: Vec<Expression>,
    pub(crate) type_params: Vec<TypeParamDecl>,
    pub(crate) top_level: Vec<DeclId>,
    pub(crate) types: TypeInterner,
}

impl Model {
    /// Declaration by id.
    ///
    /// Ids are only handed out by the builder of this model, so indexing is
    /// always in bounds.
    #[inline]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expression {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn type_param(&self, id: TypeParamId) -> &TypeParamDecl {
        &self.type_params[id.index()]
    }

    #[inline]
    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    pub fn top_level(&self) -> &[DeclId] {
        &self.top_level
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn name(&self, id: DeclId) -> &str {
        &self.decl(id).name
    }

    /// Members of a container in declaration order; empty for non-containers.
    pub fn members(&self, id: DeclId) -> &[DeclId] {
        self.decl(id)
            .as_container()
            .map(|c| c.members.as_slice())
            .unwrap_or_default()
    }

    /// Outermost container enclosing `id` (or `id` itself when top-level).
    pub fn top_level_container(&self, id: DeclId) -> DeclId {
        let mut current = id;
        while let Some(declaring) = self.decl(current).declaring {
            current = declaring;
        }
        current
    }

    /// All declarations of the containment tree rooted at `root`, in
    /// pre-order declaration order, `root` included.
    pub fn containment_tree(&self, root: DeclId) -> Vec<DeclId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.members(id).iter().rev().copied());
        }
        out
    }

    /// Write a computed type back into the inferred type slot of `member`.
    ///
    /// Fails when the slot was already resolved: re-resolution is a logic
    /// error of the caller.
    pub fn resolve_inferred(&self, member: DeclId, ty: TypeId) -> Result<(), ModelError> {
        let expr = self.to_type_expr(ty);
        debug!(
            member = %member,
            name = self.name(member),
            ty = %self.type_to_string(ty),
            "Model::resolve_inferred"
        );
        self.decl(member).resolve_inferred(member, expr)
    }
}

#[cfg(test)]
#[path = "../tests/model_tests.rs"]
mod tests;
