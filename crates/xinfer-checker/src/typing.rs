//! Expression typing.
//!
//! Deliberately small: literals, member access, `this`/`super`, parameters
//! and a little control flow. Every expression's type is recorded in the
//! frame of the unit computing it.

use crate::error::ResolveError;
use crate::resolver::RootResolver;
use crate::scope::{FrameId, ScopeKey};
use crate::session::{FeatureScopeSession, THIS};
use rustc_hash::FxHashMap;
use xinfer_model::{DeclId, DeclKind, ExprId, ExprKind, Literal, TypeData, TypeId};

impl RootResolver<'_> {
    pub(crate) fn type_expression(
        &mut self,
        expr: ExprId,
        frame: FrameId,
        session: &FeatureScopeSession,
    ) -> Result<TypeId, ResolveError> {
        let (red_zone, growth) = (self.options.stack_red_zone, self.options.stack_growth);
        stacker::maybe_grow(red_zone, growth, || self.type_expression_inner(expr, frame, session))
    }

    fn type_expression_inner(
        &mut self,
        expr: ExprId,
        frame: FrameId,
        session: &FeatureScopeSession,
    ) -> Result<TypeId, ResolveError> {
        let model = self.model;
        let ty = match &model.expr(expr).kind {
            ExprKind::Literal(literal) => match literal {
                Literal::Int(_) => TypeId::INT,
                Literal::Str(_) => TypeId::STRING,
                Literal::Bool(_) => TypeId::BOOLEAN,
                Literal::Null => TypeId::NULL,
            },
            ExprKind::FeatureCall {
                feature,
                receiver,
                args,
            } => self.type_feature_call(*feature, *receiver, args, frame, session)?,
            ExprKind::This => self.this_type(frame, session),
            ExprKind::Super => self.super_type(frame, session),
            ExprKind::Param { owner, index } => model
                .decl(*owner)
                .params()
                .get(*index as usize)
                .map_or(TypeId::ANY, |param| {
                    model.to_lightweight(&param.ty, &self.scope.bindings(frame))
                }),
            ExprKind::Block(exprs) => {
                let mut last = TypeId::VOID;
                for &inner in exprs {
                    last = self.type_expression(inner, frame, session)?;
                }
                last
            }
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.type_expression(*condition, frame, session)?;
                let then_type = self.type_expression(*then_branch, frame, session)?;
                match else_branch {
                    Some(else_branch) => {
                        let else_type = self.type_expression(*else_branch, frame, session)?;
                        model.common_type(then_type, else_type)
                    }
                    None => TypeId::VOID,
                }
            }
            // A return evaluates to the returned value so that a trailing
            // `return x` and a trailing `x` agree.
            ExprKind::Return(value) => {
                let ty = match value {
                    Some(value) => self.type_expression(*value, frame, session)?,
                    None => TypeId::VOID,
                };
                if let Some(unit) = self.units.last_mut() {
                    unit.values.push(ty);
                }
                ty
            }
        };
        self.scope.set(frame, ScopeKey::Expr(expr), ty)?;
        Ok(ty)
    }

    /// `this` of the innermost container, or `ANY` in static context.
    fn this_type(&self, frame: FrameId, session: &FeatureScopeSession) -> TypeId {
        if !session.is_instance_context() {
            return TypeId::ANY;
        }
        session
            .local_element(THIS)
            .map_or(TypeId::ANY, |container| self.container_type(container, frame))
    }

    fn super_type(&self, frame: FrameId, session: &FeatureScopeSession) -> TypeId {
        if !session.is_instance_context() {
            return TypeId::ANY;
        }
        session
            .local_element(THIS)
            .and_then(|container| self.scope.actual_type(frame, ScopeKey::Super(container)))
            .unwrap_or(TypeId::ANY)
    }

    fn container_type(&self, container: DeclId, frame: FrameId) -> TypeId {
        self.scope
            .actual_type(frame, ScopeKey::Decl(container))
            .unwrap_or_else(|| self.model.this_type(container))
    }

    fn type_feature_call(
        &mut self,
        feature: DeclId,
        receiver: Option<ExprId>,
        args: &[ExprId],
        frame: FrameId,
        session: &FeatureScopeSession,
    ) -> Result<TypeId, ResolveError> {
        let model = self.model;
        let receiver_type = match receiver {
            Some(receiver) => Some(self.type_expression(receiver, frame, session)?),
            None => None,
        };
        for &arg in args {
            self.type_expression(arg, frame, session)?;
        }

        let decl = model.decl(feature);
        match &decl.kind {
            // A type used as an expression: static access or a type literal.
            DeclKind::Container(_) => return Ok(model.this_type(feature)),
            DeclKind::Constructor(_) | DeclKind::Field(_) | DeclKind::Method(_) => {}
        }
        let raw = self.member_type(feature)?;
        let Some(declaring) = decl.declaring else {
            return Ok(raw);
        };
        if matches!(decl.kind, DeclKind::Constructor(_)) {
            return Ok(raw);
        }
        // Static members do not see the type arguments of their container.
        if decl.is_static && receiver.is_none() && session.is_visible_static_type(declaring) {
            return Ok(raw);
        }

        let view = match receiver_type {
            Some(receiver_type) => model.as_supertype(receiver_type, declaring),
            None => self.implicit_receiver_view(declaring, frame, session),
        };
        let map = match view.and_then(|view| model.types().lookup(view)) {
            Some(TypeData::Named { args, .. }) => model.type_param_map(declaring, &args),
            _ => FxHashMap::default(),
        };
        Ok(model.substitute(raw, &map))
    }

    /// View of the innermost type in static scope that inherits `declaring`,
    /// as an instantiation of `declaring`.
    fn implicit_receiver_view(
        &self,
        declaring: DeclId,
        frame: FrameId,
        session: &FeatureScopeSession,
    ) -> Option<TypeId> {
        let model = self.model;
        session
            .static_types()
            .find_map(|container| model.as_supertype(self.container_type(container, frame), declaring))
    }
}
