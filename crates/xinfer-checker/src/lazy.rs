//! Lazy type placeholders for inferred member types.
//!
//! A placeholder stands in for the type of a member whose declaration left
//! it out. It is created during preparation and settled either by the
//! computation pass reaching the member or by the first reader that needs
//! the type earlier.
//!
//! ```text
//!             enter()                  resolve(ty)
//!   Idle ───────────────> Computing ───────────────> Resolved(ty)
//!    │                      │  ^
//!    │ enter() [no body]    │  │ enter() while computing:
//!    v                      └──┘ reentrant, state unchanged
//!   Fallback(ANY)
//! ```
//!
//! The placeholder is only the state machine; the resolver drives the actual
//! computation and reports diagnostics.

use crate::scope::FrameId;
use crate::session::FeatureScopeSession;
use xinfer_model::{DeclId, ExprId, TypeId};

/// Where a placeholder's type comes from.
#[derive(Clone, Debug)]
pub enum TypeProvider {
    /// Computed from the member's body expression.
    Demand {
        member: DeclId,
        expr: ExprId,
        frame: FrameId,
        session: FeatureScopeSession,
        /// Read the body's return type (methods) rather than its actual type
        /// (field initializers).
        return_type: bool,
    },
    /// The member has no body to infer from.
    NoBody { member: DeclId },
}

impl TypeProvider {
    pub fn member(&self) -> DeclId {
        match self {
            Self::Demand { member, .. } | Self::NoBody { member } => *member,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LazyState {
    Idle,
    Computing,
    Resolved(TypeId),
    /// Permanently unresolved; the type is the fallback handed to readers.
    Fallback(TypeId),
}

/// Outcome of [`LazyType::enter`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dereference {
    /// Settled earlier; no computation needed.
    Cached(TypeId),
    /// First dereference of a demand placeholder: the caller must compute
    /// the member now.
    Compute,
    /// Dereferenced from within its own computation.
    Reentrant,
    /// No body: the placeholder just fell back to `ANY`.
    NoBody,
}

#[derive(Debug)]
pub struct LazyType {
    provider: TypeProvider,
    state: LazyState,
    activations: u32,
}

impl LazyType {
    pub fn new(provider: TypeProvider) -> Self {
        Self {
            provider,
            state: LazyState::Idle,
            activations: 0,
        }
    }

    pub fn provider(&self) -> &TypeProvider {
        &self.provider
    }

    pub fn state(&self) -> LazyState {
        self.state
    }

    /// How often the placeholder moved from idle to computing. At most one.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Settled type, if any.
    pub fn value(&self) -> Option<TypeId> {
        match self.state {
            LazyState::Resolved(ty) | LazyState::Fallback(ty) => Some(ty),
            LazyState::Idle | LazyState::Computing => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.value().is_some()
    }

    /// Begin a dereference.
    pub fn enter(&mut self) -> Dereference {
        match self.state {
            LazyState::Resolved(ty) | LazyState::Fallback(ty) => Dereference::Cached(ty),
            LazyState::Computing => Dereference::Reentrant,
            LazyState::Idle => match self.provider {
                TypeProvider::Demand { .. } => {
                    self.start_computing();
                    Dereference::Compute
                }
                TypeProvider::NoBody { .. } => {
                    self.state = LazyState::Fallback(TypeId::ANY);
                    Dereference::NoBody
                }
            },
        }
    }

    /// Move from idle to computing when the computation pass reaches the
    /// member before any reader did. Returns whether the state changed.
    ///
    /// Placeholders without a body never compute.
    pub fn start_computing(&mut self) -> bool {
        if self.state != LazyState::Idle || matches!(self.provider, TypeProvider::NoBody { .. }) {
            return false;
        }
        self.state = LazyState::Computing;
        self.activations += 1;
        true
    }

    /// Settle to the computed type. Only the first resolution sticks;
    /// returns whether this call settled the placeholder.
    pub fn resolve(&mut self, ty: TypeId) -> bool {
        match self.state {
            LazyState::Idle | LazyState::Computing => {
                self.state = LazyState::Resolved(ty);
                true
            }
            LazyState::Resolved(_) | LazyState::Fallback(_) => false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/lazy_tests.rs"]
mod tests;
