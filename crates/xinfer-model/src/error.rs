use crate::ids::DeclId;
use thiserror::Error;

/// Misuse of the model by the engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// An inferred type reference was resolved a second time.
    #[error("inferred type of {member} ('{name}') is already resolved")]
    AlreadyResolved { member: DeclId, name: String },

    /// The declaration does not carry an inferred type reference.
    #[error("{member} ('{name}') has no inferred type to resolve")]
    NotInferred { member: DeclId, name: String },
}
