//! Stacked resolved-type scope.
//!
//! Frames live in an arena and are addressed by [`FrameId`]. Each frame has a
//! parent, except the top frame of each root the resolver handles, and holds
//! the types bound while preparing or computing one declaration. Lookups read
//! through the parent chain; a child frame is merged into its parent once the
//! step that owns it is done.
//!
//! ```text
//!   root ── C ──┬── C.a       (field frame)
//!               ├── C.m       (method frame)
//!               └── C.Inner ── C.Inner.x
//! ```
//!
//! Merged frames are tombstoned rather than freed: their ids stay valid and
//! lookups through them still work, but nothing can be bound in them and
//! they cannot be merged again.
//!
//! Diagnostics are not frame scoped; they are collected once for the whole
//! tree in emission order.

use crate::diagnostics::TypeDiagnostic;
use crate::error::ResolveError;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::trace;
use xinfer_model::{DeclId, ExprId, TypeId, TypeParamBindings, TypeParamId};

/// Index of a frame in [`ResolvedTypes`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FrameId(pub u32);

impl FrameId {
    /// The frame every resolution starts from.
    pub const ROOT: Self = Self(0);

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a frame binds a type to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ScopeKey {
    /// Declared or resolved type of a declaration; for a container, its
    /// `this` type.
    Decl(DeclId),
    /// Actual type of an expression.
    Expr(ExprId),
    TypeParam(TypeParamId),
    /// The converted extended class of a container.
    Super(DeclId),
}

#[derive(Debug, Default)]
struct Frame {
    parent: Option<FrameId>,
    types: FxHashMap<ScopeKey, TypeId>,
    return_types: FxHashMap<ExprId, TypeId>,
    to_be_inferred: FxHashSet<ExprId>,
    merged: bool,
}

/// Arena of resolved-type frames plus the diagnostics of one resolution.
#[derive(Debug)]
pub struct ResolvedTypes {
    frames: Vec<Frame>,
    diagnostics: Vec<TypeDiagnostic>,
}

impl Default for ResolvedTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolvedTypes {
    /// Create a scope holding only the root frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
            diagnostics: Vec::new(),
        }
    }

    /// Open a child frame of `parent`.
    pub fn push(&mut self, parent: FrameId) -> FrameId {
        let id = FrameId(self.frames.len() as u32);
        self.frames.push(Frame {
            parent: Some(parent),
            ..Frame::default()
        });
        trace!(frame = ?id, parent = ?parent, "ResolvedTypes::push");
        id
    }

    /// Open a parentless frame for another root. Its bindings never reach
    /// [`FrameId::ROOT`].
    pub fn push_root(&mut self) -> FrameId {
        let id = FrameId(self.frames.len() as u32);
        self.frames.push(Frame::default());
        trace!(frame = ?id, "ResolvedTypes::push_root");
        id
    }

    pub fn parent(&self, frame: FrameId) -> Option<FrameId> {
        self.frames[frame.index()].parent
    }

    pub fn is_merged(&self, frame: FrameId) -> bool {
        self.frames[frame.index()].merged
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn open_frame(&mut self, frame: FrameId) -> Result<&mut Frame, ResolveError> {
        let f = &mut self.frames[frame.index()];
        if f.merged {
            return Err(ResolveError::FrameAlreadyMerged(frame));
        }
        Ok(f)
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Bind a fresh key in `frame`.
    ///
    /// Shadowing a binding of an ancestor frame is fine; binding the same key
    /// twice in one frame is not.
    pub fn set(&mut self, frame: FrameId, key: ScopeKey, ty: TypeId) -> Result<(), ResolveError> {
        let f = self.open_frame(frame)?;
        if f.types.contains_key(&key) {
            return Err(ResolveError::DuplicateBinding { key, frame });
        }
        f.types.insert(key, ty);
        trace!(frame = ?frame, key = ?key, type_id = ty.0, "ResolvedTypes::set");
        Ok(())
    }

    /// Override `key` from `frame` downwards.
    ///
    /// The binding is written into `frame` itself, whether or not an ancestor
    /// already binds `key`. Ancestors and sibling branches keep their value
    /// until the frame is merged.
    pub fn reassign(&mut self, frame: FrameId, key: ScopeKey, ty: TypeId) -> Result<(), ResolveError> {
        let f = self.open_frame(frame)?;
        f.types.insert(key, ty);
        trace!(frame = ?frame, key = ?key, type_id = ty.0, "ResolvedTypes::reassign");
        Ok(())
    }

    /// Read-through lookup of `key` starting at `frame`.
    pub fn actual_type(&self, frame: FrameId, key: ScopeKey) -> Option<TypeId> {
        self.find(frame, |f| f.types.get(&key).copied())
    }

    pub fn set_return_type(&mut self, frame: FrameId, expr: ExprId, ty: TypeId) -> Result<(), ResolveError> {
        let f = self.open_frame(frame)?;
        if f.return_types.contains_key(&expr) {
            return Err(ResolveError::DuplicateBinding {
                key: ScopeKey::Expr(expr),
                frame,
            });
        }
        f.return_types.insert(expr, ty);
        Ok(())
    }

    pub fn return_type(&self, frame: FrameId, expr: ExprId) -> Option<TypeId> {
        self.find(frame, |f| f.return_types.get(&expr).copied())
    }

    /// Mark `expr` as the body an inferred member type is computed from.
    pub fn mark_to_be_inferred(&mut self, frame: FrameId, expr: ExprId) -> Result<(), ResolveError> {
        self.open_frame(frame)?.to_be_inferred.insert(expr);
        Ok(())
    }

    pub fn is_to_be_inferred(&self, frame: FrameId, expr: ExprId) -> bool {
        self.find(frame, |f| f.to_be_inferred.contains(&expr).then_some(()))
            .is_some()
    }

    fn find<T>(&self, frame: FrameId, mut visit: impl FnMut(&Frame) -> Option<T>) -> Option<T> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let f = &self.frames[id.index()];
            if let Some(found) = visit(f) {
                return Some(found);
            }
            current = f.parent;
        }
        None
    }

    /// Type parameter bindings as seen from `frame`.
    pub fn bindings(&self, frame: FrameId) -> ScopeBindings<'_> {
        ScopeBindings { scope: self, frame }
    }

    // =========================================================================
    // Merging
    // =========================================================================

    /// Copy every binding of `frame` into its parent, overwriting the
    /// parent's bindings on collision, and tombstone `frame`.
    ///
    /// Merging the root frame only tombstones it.
    pub fn merge_into_parent(&mut self, frame: FrameId) -> Result<(), ResolveError> {
        let child = self.open_frame(frame)?;
        child.merged = true;
        let Some(parent) = child.parent else {
            return Ok(());
        };
        let types: Vec<_> = child.types.iter().map(|(k, v)| (*k, *v)).collect();
        let return_types: Vec<_> = child.return_types.iter().map(|(k, v)| (*k, *v)).collect();
        let to_be_inferred: Vec<_> = child.to_be_inferred.iter().copied().collect();

        let target = &mut self.frames[parent.index()];
        target.types.extend(types);
        target.return_types.extend(return_types);
        target.to_be_inferred.extend(to_be_inferred);
        trace!(frame = ?frame, parent = ?parent, "ResolvedTypes::merge_into_parent");
        Ok(())
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub fn add_diagnostic(&mut self, diagnostic: TypeDiagnostic) {
        trace!(code = diagnostic.code, element = %diagnostic.element, "ResolvedTypes::add_diagnostic");
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[TypeDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<TypeDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Bindings of the root frame and the diagnostics, consuming the scope.
    pub(crate) fn into_root_parts(mut self) -> RootParts {
        let root = std::mem::take(&mut self.frames[FrameId::ROOT.index()]);
        RootParts {
            types: root.types,
            return_types: root.return_types,
            diagnostics: self.diagnostics,
        }
    }
}

/// What is left of a scope once resolution is over.
pub(crate) struct RootParts {
    pub(crate) types: FxHashMap<ScopeKey, TypeId>,
    pub(crate) return_types: FxHashMap<ExprId, TypeId>,
    pub(crate) diagnostics: Vec<TypeDiagnostic>,
}

/// [`TypeParamBindings`] backed by a scope frame.
pub struct ScopeBindings<'a> {
    scope: &'a ResolvedTypes,
    frame: FrameId,
}

impl TypeParamBindings for ScopeBindings<'_> {
    fn bound_type(&self, param: TypeParamId) -> Option<TypeId> {
        self.scope.actual_type(self.frame, ScopeKey::TypeParam(param))
    }
}

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod tests;
