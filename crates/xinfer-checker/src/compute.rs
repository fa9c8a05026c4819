//! Computation pass.
//!
//! Walks the prepared tree in declaration order and computes each member in
//! the frame preparation opened for it. A member is computed at most once:
//! taking its prepared state out of the map is what marks it done, whether
//! the walk got there first or a reader dereferenced its placeholder.

use crate::error::ResolveError;
use crate::lazy::{LazyType, TypeProvider};
use crate::resolver::{PreparedMember, RootResolver, UnitReturns};
use crate::scope::{FrameId, ScopeKey};
use crate::session::FeatureScopeSession;
use tracing::{debug, trace};
use xinfer_model::{Annotation, AnnotationValue, DeclId, DeclKind, ExprId, Model, TypeId};

/// What a piece of code is computed as.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComputationUnit {
    FieldInitializer { field: DeclId, expr: ExprId },
    ConstructorBody { constructor: DeclId, expr: ExprId },
    /// Records the body's return type besides the expression types.
    MethodBody { method: DeclId, expr: ExprId },
    AnnotationValue { owner: DeclId, expr: ExprId },
}

impl ComputationUnit {
    /// Unit computing the body of `member`, if it has one.
    pub fn for_member(model: &Model, member: DeclId) -> Option<Self> {
        match &model.decl(member).kind {
            DeclKind::Field(field) => field.initializer.map(|expr| Self::FieldInitializer {
                field: member,
                expr,
            }),
            DeclKind::Constructor(ctor) => ctor.body.map(|expr| Self::ConstructorBody {
                constructor: member,
                expr,
            }),
            DeclKind::Method(method) => method.body.map(|expr| Self::MethodBody {
                method: member,
                expr,
            }),
            DeclKind::Container(_) => None,
        }
    }

    pub const fn expr(self) -> ExprId {
        match self {
            Self::FieldInitializer { expr, .. }
            | Self::ConstructorBody { expr, .. }
            | Self::MethodBody { expr, .. }
            | Self::AnnotationValue { expr, .. } => expr,
        }
    }

    pub const fn owner(self) -> DeclId {
        match self {
            Self::FieldInitializer { field: owner, .. }
            | Self::ConstructorBody {
                constructor: owner, ..
            }
            | Self::MethodBody { method: owner, .. }
            | Self::AnnotationValue { owner, .. } => owner,
        }
    }
}

impl RootResolver<'_> {
    /// Compute every member of `container`, then merge its frame.
    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn compute_container(&mut self, container: DeclId) -> Result<(), ResolveError> {
        let model = self.model;
        let Some(prepared) = self.containers.get(&container).cloned() else {
            if self.skipped.contains(&container) {
                return Ok(());
            }
            return Err(ResolveError::NoResolvedType {
                member: container,
                name: model.name(container).to_string(),
            });
        };
        let frame = prepared.frame;

        // Members computed early may have run through this frame; re-derive
        // the container binding before the walk.
        let this_type = self
            .scope
            .actual_type(frame, ScopeKey::Decl(container))
            .unwrap_or_else(|| model.this_type(container));
        self.scope.reassign(frame, ScopeKey::Decl(container), this_type)?;

        for &member in model.members(container) {
            if model.decl(member).is_container() {
                self.compute_container(member)?;
            } else {
                self.compute_member(member)?;
            }
        }

        self.compute_annotations(container, frame, &prepared.enclosing)?;
        self.scope.merge_into_parent(frame)
    }

    /// Compute `member` unless it was computed already or is not ours.
    ///
    /// A member that was neither prepared nor skipped during preparation is
    /// an error.
    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn compute_member(&mut self, member: DeclId) -> Result<(), ResolveError> {
        let prepared = match self.prepared.get_mut(&member) {
            Some(slot) => match slot.take() {
                Some(prepared) => prepared,
                None => return Ok(()),
            },
            None if self.skipped.contains(&member) => return Ok(()),
            None => {
                return Err(ResolveError::NoResolvedType {
                    member,
                    name: self.model.name(member).to_string(),
                });
            }
        };
        let (red_zone, growth) = (self.options.stack_red_zone, self.options.stack_growth);
        stacker::maybe_grow(red_zone, growth, || self.compute_prepared(member, prepared))
    }

    fn compute_prepared(&mut self, member: DeclId, prepared: PreparedMember) -> Result<(), ResolveError> {
        let model = self.model;
        let PreparedMember {
            frame,
            session,
            static_session,
        } = prepared;

        if let Some(lazy) = self.placeholders.get_mut(&member) {
            lazy.start_computing();
        }

        if let Some(unit) = ComputationUnit::for_member(model, member) {
            *self.stats.body_computations.entry(member).or_default() += 1;
            self.run_unit(unit, frame, &session)?;
            self.resolve_placeholder(member, frame)?;
        }

        // Without a body the placeholder is still idle; dereferencing it
        // settles it and reports why.
        if self.placeholders.get(&member).is_some_and(|lazy| !lazy.is_settled()) {
            self.member_type(member)?;
        }
        if let Some(ty) = self.placeholders.get(&member).and_then(LazyType::value) {
            self.scope.reassign(frame, ScopeKey::Decl(member), ty)?;
        }

        self.compute_annotations(member, frame, &static_session)?;
        self.scope.merge_into_parent(frame)
    }

    /// Settle the placeholder of `member` from what its unit recorded and
    /// write the type back into the model.
    fn resolve_placeholder(&mut self, member: DeclId, frame: FrameId) -> Result<(), ResolveError> {
        let model = self.model;
        let Some(lazy) = self.placeholders.get(&member) else {
            return Ok(());
        };
        let TypeProvider::Demand {
            expr, return_type, ..
        } = *lazy.provider()
        else {
            return Ok(());
        };
        if !self.scope.is_to_be_inferred(frame, expr) {
            return Err(ResolveError::NoResolvedType {
                member,
                name: model.name(member).to_string(),
            });
        }
        let computed = if return_type {
            self.scope.return_type(frame, expr)
        } else {
            self.scope.actual_type(frame, ScopeKey::Expr(expr))
        };
        let ty = computed.ok_or(ResolveError::NoExpressionType { expr })?;

        let settled = self
            .placeholders
            .get_mut(&member)
            .is_some_and(|lazy| lazy.resolve(ty));
        if settled {
            debug!(
                member = %member,
                name = model.name(member),
                ty = %model.type_to_string(ty),
                "resolved inferred type"
            );
            model.resolve_inferred(member, ty)?;
        }
        Ok(())
    }

    /// Run one unit in `frame` and return the type of its expression; for
    /// method bodies, the joined return type.
    pub(crate) fn run_unit(
        &mut self,
        unit: ComputationUnit,
        frame: FrameId,
        session: &FeatureScopeSession,
    ) -> Result<TypeId, ResolveError> {
        trace!(unit = ?unit, frame = ?frame, "run_unit");
        self.units.push(UnitReturns::default());
        let typed = self.type_expression(unit.expr(), frame, session);
        let returns = self.units.pop().unwrap_or_default();
        let ty = typed?;

        match unit {
            ComputationUnit::MethodBody { expr, .. } => {
                let model = self.model;
                let joined = returns
                    .values
                    .iter()
                    .fold(ty, |acc, value| model.common_type(acc, *value));
                self.scope.set_return_type(frame, expr, joined)?;
                Ok(joined)
            }
            ComputationUnit::FieldInitializer { .. }
            | ComputationUnit::ConstructorBody { .. }
            | ComputationUnit::AnnotationValue { .. } => Ok(ty),
        }
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    /// Compute the annotations of `owner` and of its parameters.
    fn compute_annotations(
        &mut self,
        owner: DeclId,
        frame: FrameId,
        session: &FeatureScopeSession,
    ) -> Result<(), ResolveError> {
        let model = self.model;
        let decl = model.decl(owner);
        let param_annotations = decl.params().iter().flat_map(|param| &param.annotations);
        for annotation in decl.annotations.iter().chain(param_annotations) {
            self.compute_annotation(owner, annotation, frame, session)?;
        }
        Ok(())
    }

    fn compute_annotation(
        &mut self,
        owner: DeclId,
        annotation: &Annotation,
        frame: FrameId,
        session: &FeatureScopeSession,
    ) -> Result<(), ResolveError> {
        if let Some(expr) = annotation.source {
            self.run_unit(ComputationUnit::AnnotationValue { owner, expr }, frame, session)?;
            return Ok(());
        }
        for value in &annotation.values {
            match value {
                AnnotationValue::Expressions(exprs) => {
                    for &expr in exprs {
                        self.run_unit(ComputationUnit::AnnotationValue { owner, expr }, frame, session)?;
                    }
                }
                AnnotationValue::Nested(nested) => {
                    for inner in nested {
                        self.compute_annotation(owner, inner, frame, session)?;
                    }
                }
                AnnotationValue::Constant => {}
            }
        }
        Ok(())
    }
}
