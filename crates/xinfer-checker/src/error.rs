//! Programming errors of the engine.
//!
//! These abort resolution of the current root. Problems in the user's model
//! (missing bodies, recursive inference) are never errors: they are reported
//! as [`TypeDiagnostic`](crate::TypeDiagnostic)s and resolution goes on.

use crate::scope::{FrameId, ScopeKey};
use thiserror::Error;
use xinfer_model::{DeclId, ExprId, ModelError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A key was bound twice in the same frame.
    #[error("{key:?} is already bound in frame {frame:?}")]
    DuplicateBinding { key: ScopeKey, frame: FrameId },

    /// A member's computation finished without producing a type, or a
    /// member was computed that preparation never saw.
    #[error("no type was resolved for {member} ('{name}')")]
    NoResolvedType { member: DeclId, name: String },

    /// A body expression had no type recorded after its unit ran.
    #[error("no type was recorded for body expression {expr}")]
    NoExpressionType { expr: ExprId },

    /// The declaring type of an overriding method was asked for before it
    /// was bound.
    #[error("declaring type of {method} has no resolved type while looking up overridden {overridden}")]
    OverrideResolution { method: DeclId, overridden: DeclId },

    #[error("frame {0:?} was already merged into its parent")]
    FrameAlreadyMerged(FrameId),

    /// The model rejected writing back an inferred type.
    #[error(transparent)]
    AlreadyResolved(#[from] ModelError),

    #[error("{0} is not a container declaration")]
    NotAContainer(DeclId),
}
