//! Preparation pass.
//!
//! Builds the frame tree of a root before any body is looked at. Every
//! declaration of the containment tree gets its own frame, in declaration
//! order, so that a member computed early (because someone dereferenced its
//! placeholder) already finds the bindings of every container around it.

use crate::error::ResolveError;
use crate::lazy::{LazyType, TypeProvider};
use crate::resolver::{PreparedContainer, PreparedMember, RootResolver};
use crate::scope::{FrameId, ScopeKey};
use crate::session::{FeatureScopeSession, LocalElements, SUPER, THIS};
use tracing::{debug, trace};
use xinfer_model::{DeclId, DeclKind, ExprId, TypeParamId, TypeRef};

impl RootResolver<'_> {
    /// Claim the root and prepare its tree. Returns `false` when the root
    /// was already claimed by another resolver.
    #[tracing::instrument(level = "trace", skip(self, session), fields(root = %self.root))]
    pub(crate) fn prepare(&mut self, session: &FeatureScopeSession) -> Result<bool, ResolveError> {
        self.prepare_root(self.root, FrameId::ROOT, session)
    }

    /// Claim `root` and prepare its tree below `top`.
    pub(crate) fn prepare_root(
        &mut self,
        root: DeclId,
        top: FrameId,
        session: &FeatureScopeSession,
    ) -> Result<bool, ResolveError> {
        if !self.tracker.claim(root) {
            return Ok(false);
        }
        let frame = self.scope.push(top);
        self.prepare_container(root, frame, session)?;
        debug!(
            root = %root,
            members = self.prepared.len(),
            placeholders = self.placeholders.len(),
            "prepared root"
        );
        Ok(true)
    }

    fn prepare_container(
        &mut self,
        container: DeclId,
        frame: FrameId,
        outer: &FeatureScopeSession,
    ) -> Result<(), ResolveError> {
        let model = self.model;
        let Some(decl) = model.decl(container).as_container() else {
            return Err(ResolveError::NotAContainer(container));
        };

        self.declare_type_params(frame, &decl.type_params)?;
        // Rebound here even if an enclosing frame knows the container, so
        // nested containers see the locally instantiated form.
        self.scope
            .reassign(frame, ScopeKey::Decl(container), model.this_type(container))?;

        let mut locals = LocalElements::default();
        locals.insert(THIS.into(), container);
        if let Some(supertype) = model.extended_class(container) {
            let super_type = model.to_lightweight(supertype, &self.scope.bindings(frame));
            self.scope.set(frame, ScopeKey::Super(container), super_type)?;
            if let Some(super_decl) = supertype.named_decl() {
                locals.insert(SUPER.into(), super_decl);
            }
        }
        let session = outer
            .add_local_elements(locals)
            .add_types_to_static_scope(&[container]);
        self.containers.insert(
            container,
            PreparedContainer {
                frame,
                session: session.clone(),
                enclosing: outer.clone(),
            },
        );

        for &member in &decl.members {
            if !self.tracker.claim(member) {
                debug!(member = %member, "member claimed by another resolver, skipping");
                self.skipped.insert(member);
                continue;
            }
            let child = self.scope.push(frame);
            self.prepare_member(member, child, &session)?;
        }
        Ok(())
    }

    fn prepare_member(
        &mut self,
        member: DeclId,
        frame: FrameId,
        container_session: &FeatureScopeSession,
    ) -> Result<(), ResolveError> {
        let model = self.model;
        let decl = model.decl(member);
        let session = if decl.is_static {
            container_session.clone()
        } else {
            container_session.to_instance_context()
        };

        match &decl.kind {
            DeclKind::Container(_) => {
                return self.prepare_container(member, frame, container_session);
            }
            DeclKind::Field(field) => {
                self.install_type(member, frame, &field.ty, field.initializer, false, &session)?;
            }
            DeclKind::Method(method) => {
                self.declare_type_params(frame, &method.type_params)?;
                self.install_type(member, frame, &method.return_type, method.body, true, &session)?;
            }
            DeclKind::Constructor(_) => {
                let Some(container) = decl.declaring else {
                    return Err(ResolveError::NotAContainer(member));
                };
                self.scope
                    .set(frame, ScopeKey::Decl(member), model.this_type(container))?;
            }
        }

        trace!(member = %member, frame = ?frame, "prepared member");
        self.prepared.insert(
            member,
            Some(PreparedMember {
                frame,
                session,
                static_session: container_session.clone(),
            }),
        );
        Ok(())
    }

    /// Bind declared type parameters to themselves, shadowing any outer
    /// binding of the same parameter.
    fn declare_type_params(&mut self, frame: FrameId, params: &[TypeParamId]) -> Result<(), ResolveError> {
        for &param in params {
            self.scope
                .set(frame, ScopeKey::TypeParam(param), self.model.param_type(param))?;
        }
        Ok(())
    }

    /// Bind an explicit type, or install a placeholder for an inferred one.
    fn install_type(
        &mut self,
        member: DeclId,
        frame: FrameId,
        ty: &TypeRef,
        body: Option<ExprId>,
        return_type: bool,
        session: &FeatureScopeSession,
    ) -> Result<(), ResolveError> {
        let model = self.model;
        let known = match ty {
            TypeRef::Explicit(ty) => Some(ty),
            TypeRef::Inferred(slot) => slot.resolved(),
        };
        if let Some(known) = known {
            let ty = model.to_lightweight(known, &self.scope.bindings(frame));
            return self.scope.set(frame, ScopeKey::Decl(member), ty);
        }

        let provider = match body {
            Some(expr) => {
                self.scope.mark_to_be_inferred(frame, expr)?;
                TypeProvider::Demand {
                    member,
                    expr,
                    frame,
                    session: session.clone(),
                    return_type,
                }
            }
            None => TypeProvider::NoBody { member },
        };
        trace!(member = %member, has_body = body.is_some(), "installed placeholder");
        self.placeholders.insert(member, LazyType::new(provider));
        Ok(())
    }
}
