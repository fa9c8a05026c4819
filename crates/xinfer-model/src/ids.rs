//! Arena identities.
//!
//! Declarations, expressions and type parameters are addressed by index into
//! the owning [`Model`](crate::Model). Identity is by index, never by name:
//! two methods named `size` are two different `DeclId`s.

use serde::Serialize;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExprId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeParamId(pub u32);

impl DeclId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl ExprId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TypeParamId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expr#{}", self.0)
    }
}

/// Any identifiable element of the model: a declaration or an expression.
///
/// Used wherever the engine needs an identity-keyed set spanning both kinds,
/// most notably the root membership tracker and diagnostic sources.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Element {
    Decl(DeclId),
    Expr(ExprId),
}

impl From<DeclId> for Element {
    fn from(id: DeclId) -> Self {
        Self::Decl(id)
    }
}

impl From<ExprId> for Element {
    fn from(id: ExprId) -> Self {
        Self::Expr(id)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decl(id) => id.fmt(f),
            Self::Expr(id) => id.fmt(f),
        }
    }
}
