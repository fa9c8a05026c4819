//! Root resolver: the entry point of type resolution.
//!
//! A [`RootResolver`] resolves every inferred type reachable from one
//! top-level container in two passes:
//!
//! 1. **Preparation** (`prepare.rs`) walks the containment tree in
//!    declaration order, opens one scope frame per declaration, binds
//!    explicit types and installs a [`LazyType`] for every inferred one.
//! 2. **Computation** (`compute.rs`) walks the tree again and runs each
//!    member's body. Placeholders dereferenced before their member is
//!    reached compute that member on the spot.
//!
//! Inference cycles end at the first reentrant dereference, which yields the
//! top type plus a warning. Everything the passes share lives on the
//! resolver; the tracker is the only state shared with other resolvers.
//!
//! Reading an unresolved member of another, unclaimed root adopts that root:
//! it is prepared into this resolver, the member read is computed on the
//! spot, and the rest of the adopted root is computed after this root.
//! Members of adopted roots therefore go through the same placeholders, so
//! only a genuine cycle ends in a fallback.

use crate::diagnostics::TypeDiagnostic;
use crate::error::ResolveError;
use crate::lazy::{Dereference, LazyType};
use crate::options::ResolverOptions;
use crate::scope::{FrameId, ResolvedTypes, ScopeKey};
use crate::session::FeatureScopeSession;
use crate::tracker::RootedElements;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use tracing::{debug, trace};
use xinfer_common::diagnostic_codes;
use xinfer_common::limits::PREPARED_MEMBERS_CAPACITY;
use xinfer_model::{
    DeclId, DeclKind, Element, ExprId, LogicalContainerProvider, Model, NoBindings,
    OverrideLookup, TypeId, TypeRef,
};

// =============================================================================
// Result
// =============================================================================

/// Counters describing how a resolution went.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Idle-to-computing transitions per placeholder.
    pub placeholder_activations: BTreeMap<DeclId, u32>,
    /// Body computations per member.
    pub body_computations: BTreeMap<DeclId, u32>,
    /// Reentrant dereferences answered with the top type.
    pub reentrant_fallbacks: u32,
    /// Reentrant dereferences answered with an overridden return type.
    pub override_hints: u32,
    /// Other roots adopted while resolving this one.
    pub nested_roots: u32,
}

/// Everything a resolution produced.
#[derive(Debug)]
pub struct ResolutionResult {
    root: DeclId,
    types: FxHashMap<ScopeKey, TypeId>,
    return_types: FxHashMap<ExprId, TypeId>,
    diagnostics: Vec<TypeDiagnostic>,
    stats: ResolutionStats,
}

impl ResolutionResult {
    fn empty(root: DeclId) -> Self {
        Self {
            root,
            types: FxHashMap::default(),
            return_types: FxHashMap::default(),
            diagnostics: Vec::new(),
            stats: ResolutionStats::default(),
        }
    }

    pub fn root(&self) -> DeclId {
        self.root
    }

    /// Diagnostics in emission order.
    pub fn diagnostics(&self) -> &[TypeDiagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(TypeDiagnostic::is_error)
    }

    pub fn actual_type(&self, expr: ExprId) -> Option<TypeId> {
        self.types.get(&ScopeKey::Expr(expr)).copied()
    }

    pub fn return_type(&self, expr: ExprId) -> Option<TypeId> {
        self.return_types.get(&expr).copied()
    }

    /// Declared or inferred type of a member; the `this` type of a container.
    pub fn declared_type(&self, decl: DeclId) -> Option<TypeId> {
        self.types.get(&ScopeKey::Decl(decl)).copied()
    }

    pub fn stats(&self) -> &ResolutionStats {
        &self.stats
    }

    /// Whether the root was already claimed and nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.diagnostics.is_empty()
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Frame and environment a member is computed with.
#[derive(Clone, Debug)]
pub(crate) struct PreparedMember {
    pub(crate) frame: FrameId,
    pub(crate) session: FeatureScopeSession,
    /// Session of the declaring container, used for annotation values.
    pub(crate) static_session: FeatureScopeSession,
}

#[derive(Clone, Debug)]
pub(crate) struct PreparedContainer {
    pub(crate) frame: FrameId,
    pub(crate) session: FeatureScopeSession,
    /// Session around the container, used for its own annotations.
    pub(crate) enclosing: FeatureScopeSession,
}

/// Return values collected while one computation unit runs.
#[derive(Debug, Default)]
pub(crate) struct UnitReturns {
    pub(crate) values: SmallVec<[TypeId; 4]>,
}

pub struct RootResolver<'m> {
    pub(crate) model: &'m Model,
    pub(crate) root: DeclId,
    pub(crate) tracker: RootedElements,
    pub(crate) options: ResolverOptions,
    pub(crate) scope: ResolvedTypes,
    pub(crate) session: FeatureScopeSession,
    pub(crate) placeholders: FxHashMap<DeclId, LazyType>,
    /// Member -> prepared state; `None` once the member has been computed.
    pub(crate) prepared: FxHashMap<DeclId, Option<PreparedMember>>,
    pub(crate) containers: FxHashMap<DeclId, PreparedContainer>,
    /// Members and nested containers claimed by another resolver.
    pub(crate) skipped: FxHashSet<DeclId>,
    /// Roots adopted on demand, computed after the root in adoption order.
    pub(crate) adopted: Vec<DeclId>,
    pub(crate) units: Vec<UnitReturns>,
    pub(crate) stats: ResolutionStats,
}

impl<'m> RootResolver<'m> {
    pub fn new(
        model: &'m Model,
        root: DeclId,
        tracker: RootedElements,
        options: ResolverOptions,
    ) -> Self {
        Self {
            model,
            root,
            tracker,
            options,
            scope: ResolvedTypes::new(),
            session: FeatureScopeSession::new(),
            placeholders: FxHashMap::default(),
            prepared: FxHashMap::with_capacity_and_hasher(
                PREPARED_MEMBERS_CAPACITY,
                Default::default(),
            ),
            containers: FxHashMap::default(),
            skipped: FxHashSet::default(),
            adopted: Vec::new(),
            units: Vec::new(),
            stats: ResolutionStats::default(),
        }
    }

    /// Resolve every inferred type reachable from the root.
    ///
    /// On success every inferred member of the root tree is either resolved
    /// (and written back into the model) or permanently fallen back, with a
    /// diagnostic explaining why. A root already claimed by another resolver
    /// sharing the tracker yields an empty result.
    #[tracing::instrument(level = "debug", skip(self, session), fields(root = %self.root))]
    pub fn resolve(mut self, session: &FeatureScopeSession) -> Result<ResolutionResult, ResolveError> {
        if !self.model.decl(self.root).is_container() {
            return Err(ResolveError::NotAContainer(self.root));
        }
        self.session = session.clone();
        if !self.prepare(session)? {
            debug!(root = %self.root, "root already claimed, skipping");
            return Ok(ResolutionResult::empty(self.root));
        }
        self.compute_container(self.root)?;
        // Computing an adopted root may adopt more.
        let mut next = 0;
        while let Some(&adopted) = self.adopted.get(next) {
            self.compute_container(adopted)?;
            next += 1;
        }
        Ok(self.finish())
    }

    fn finish(self) -> ResolutionResult {
        let mut stats = self.stats;
        stats.placeholder_activations = self
            .placeholders
            .iter()
            .filter(|(_, lazy)| lazy.activations() > 0)
            .map(|(member, lazy)| (*member, lazy.activations()))
            .collect();
        let parts = self.scope.into_root_parts();
        debug!(
            root = %self.root,
            diagnostics = parts.diagnostics.len(),
            reentrant_fallbacks = stats.reentrant_fallbacks,
            "RootResolver::finish"
        );
        ResolutionResult {
            root: self.root,
            types: parts.types,
            return_types: parts.return_types,
            diagnostics: parts.diagnostics,
            stats,
        }
    }

    fn report(&mut self, code: u32, element: Element, args: &[&str]) {
        let source = self.model.primary_source_element(element);
        self.scope.add_diagnostic(TypeDiagnostic::new(code, source, args));
    }

    // =========================================================================
    // Member types
    // =========================================================================

    /// Type of `member` as seen by a reader, uninstantiated.
    ///
    /// Inferred members of this root are obtained by dereferencing their
    /// placeholder, which computes the member if nobody has yet.
    pub(crate) fn member_type(&mut self, member: DeclId) -> Result<TypeId, ResolveError> {
        let model = self.model;
        if let Some(lazy) = self.placeholders.get_mut(&member) {
            return match lazy.enter() {
                Dereference::Cached(ty) => Ok(ty),
                Dereference::Compute => {
                    trace!(member = %member, "placeholder activated by reader");
                    self.compute_member(member)?;
                    self.placeholders
                        .get(&member)
                        .and_then(LazyType::value)
                        .ok_or_else(|| ResolveError::NoResolvedType {
                            member,
                            name: model.name(member).to_string(),
                        })
                }
                Dereference::Reentrant => self.reentrant_fallback(member),
                Dereference::NoBody => {
                    self.report(diagnostic_codes::CANNOT_INFER_TYPE, member.into(), &[model.name(member)]);
                    Ok(TypeId::ANY)
                }
            };
        }

        let decl = model.decl(member);
        match &decl.kind {
            DeclKind::Container(_) => Ok(model.this_type(member)),
            DeclKind::Constructor(_) => Ok(decl
                .declaring
                .map_or(TypeId::ANY, |container| model.this_type(container))),
            DeclKind::Field(_) | DeclKind::Method(_) => match decl.type_ref() {
                Some(TypeRef::Explicit(ty)) => Ok(model.to_lightweight(ty, &NoBindings)),
                Some(TypeRef::Inferred(slot)) => match slot.resolved() {
                    Some(ty) => Ok(model.to_lightweight(ty, &NoBindings)),
                    None => self.foreign_member_type(member),
                },
                None => Ok(TypeId::ANY),
            },
        }
    }

    /// Answer a dereference of a placeholder whose member is being computed.
    fn reentrant_fallback(&mut self, member: DeclId) -> Result<TypeId, ResolveError> {
        if self.options.overridden_return_type_hints
            && let Some(hint) = self.overridden_return_type(member)?
        {
            self.stats.override_hints += 1;
            debug!(member = %member, hint = hint.0, "reentrant dereference served by override");
            return Ok(hint);
        }
        self.stats.reentrant_fallbacks += 1;
        let model = self.model;
        let name = model.name(member);
        let fallback = model.type_to_string(TypeId::ANY);
        debug!(member = %member, name, "reentrant dereference falls back to top type");
        self.report(
            diagnostic_codes::CANNOT_INFER_TYPE_FROM_RECURSIVE_USAGE,
            member.into(),
            &[name, &fallback],
        );
        Ok(TypeId::ANY)
    }

    /// Known return type of the method `member` overrides, instantiated for
    /// `member`'s container.
    ///
    /// The container must already be bound: asking before preparation is an
    /// error.
    pub(crate) fn overridden_return_type(&self, member: DeclId) -> Result<Option<TypeId>, ResolveError> {
        let model = self.model;
        let Some(overridden) = model.overridden_method(member) else {
            return Ok(None);
        };
        let Some(container) = model.decl(member).declaring else {
            return Ok(None);
        };
        let declaring_type = self
            .containers
            .get(&container)
            .and_then(|prepared| self.scope.actual_type(prepared.frame, ScopeKey::Decl(container)))
            .ok_or(ResolveError::OverrideResolution {
                method: member,
                overridden,
            })?;
        Ok(model.return_type_of_overridden(member, declaring_type))
    }

    /// Type of an unresolved inferred member outside this root.
    fn foreign_member_type(&mut self, member: DeclId) -> Result<TypeId, ResolveError> {
        let model = self.model;
        let foreign_root = model.top_level_container(member);

        if self.tracker.is_handled(model, Element::Decl(member)) {
            return Ok(self.resolved_elsewhere(member, foreign_root));
        }
        if !self.options.resolve_foreign_roots {
            let fallback = model.type_to_string(TypeId::ANY);
            self.report(
                diagnostic_codes::CANNOT_INFER_TYPE_OUTSIDE_OF_ROOT,
                member.into(),
                &[model.name(member), model.name(foreign_root), &fallback],
            );
            return Ok(TypeId::ANY);
        }

        let top = self.scope.push_root();
        let session = self.session.clone();
        if !self.prepare_root(foreign_root, top, &session)? {
            // Claimed by another resolver since the check above.
            return Ok(self.resolved_elsewhere(member, foreign_root));
        }
        debug!(member = %member, foreign_root = %foreign_root, "adopted foreign root");
        self.adopted.push(foreign_root);
        self.stats.nested_roots += 1;

        if self.placeholders.contains_key(&member) {
            return self.member_type(member);
        }
        Ok(model
            .decl(member)
            .type_ref()
            .and_then(TypeRef::known_type)
            .map_or(TypeId::ANY, |ty| model.to_lightweight(ty, &NoBindings)))
    }

    /// Fallback for a member some other resolver is responsible for.
    fn resolved_elsewhere(&mut self, member: DeclId, foreign_root: DeclId) -> TypeId {
        let model = self.model;
        let fallback = model.type_to_string(TypeId::ANY);
        self.report(
            diagnostic_codes::CANNOT_INFER_TYPE_OF_MEMBER_RESOLVED_ELSEWHERE,
            member.into(),
            &[model.name(member), model.name(foreign_root), &fallback],
        );
        TypeId::ANY
    }
}

/// Resolve `root` starting from an empty top-level session.
pub fn resolve_root(
    model: &Model,
    root: DeclId,
    tracker: &RootedElements,
    options: ResolverOptions,
) -> Result<ResolutionResult, ResolveError> {
    RootResolver::new(model, root, tracker.clone(), options).resolve(&FeatureScopeSession::new())
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
