//! Lightweight type representation.
//!
//! Two representations coexist:
//!
//! | Representation | Owner | Use |
//! |----------------|-------|-----|
//! | [`TypeExpr`] | Front end | Declared types, written-back inferred types |
//! | [`TypeId`] / [`TypeData`] | [`TypeInterner`](crate::TypeInterner) | Everything the engine computes |
//!
//! `TypeId`s are interned, so type equality is an integer comparison.

use crate::ids::{DeclId, TypeParamId};
use serde::Serialize;
use smallvec::SmallVec;

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Top type, also the fallback for anything that cannot be inferred.
    pub const ANY: Self = Self(0);
    pub const VOID: Self = Self(1);
    pub const BOOLEAN: Self = Self(2);
    pub const INT: Self = Self(3);
    pub const STRING: Self = Self(4);
    /// Type of the `null` literal; joins with any named type.
    pub const NULL: Self = Self(5);

    /// Number of pre-interned intrinsic types.
    pub(crate) const INTRINSIC_COUNT: u32 = 6;

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::INTRINSIC_COUNT
    }
}

/// Built-in types every model knows about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IntrinsicKind {
    Any,
    Void,
    Boolean,
    Int,
    String,
    Null,
}

impl IntrinsicKind {
    /// All intrinsics, in `TypeId` order.
    pub const ALL: [Self; 6] = [
        Self::Any,
        Self::Void,
        Self::Boolean,
        Self::Int,
        Self::String,
        Self::Null,
    ];

    pub const fn type_id(self) -> TypeId {
        match self {
            Self::Any => TypeId::ANY,
            Self::Void => TypeId::VOID,
            Self::Boolean => TypeId::BOOLEAN,
            Self::Int => TypeId::INT,
            Self::String => TypeId::STRING,
            Self::Null => TypeId::NULL,
        }
    }

    /// Source-level spelling, used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "Object",
            Self::Void => "void",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::String => "String",
            Self::Null => "null",
        }
    }
}

/// Structure of an interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    /// A reference to a container, possibly parameterized: `List<String>`.
    Named {
        decl: DeclId,
        args: SmallVec<[TypeId; 2]>,
    },
    /// An unsubstituted type parameter.
    Param(TypeParamId),
}

/// Raw, declaration-compatible type descriptor as written by the front end.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Intrinsic(IntrinsicKind),
    Named { decl: DeclId, args: Vec<TypeExpr> },
    Param(TypeParamId),
}

impl TypeExpr {
    /// Unparameterized reference to `decl`.
    pub const fn named(decl: DeclId) -> Self {
        Self::Named {
            decl,
            args: Vec::new(),
        }
    }

    pub const fn generic(decl: DeclId, args: Vec<TypeExpr>) -> Self {
        Self::Named { decl, args }
    }

    pub const fn any() -> Self {
        Self::Intrinsic(IntrinsicKind::Any)
    }

    pub const fn int() -> Self {
        Self::Intrinsic(IntrinsicKind::Int)
    }

    pub const fn string() -> Self {
        Self::Intrinsic(IntrinsicKind::String)
    }

    pub const fn boolean() -> Self {
        Self::Intrinsic(IntrinsicKind::Boolean)
    }

    pub const fn void() -> Self {
        Self::Intrinsic(IntrinsicKind::Void)
    }

    /// The declaration this expression names, if any.
    pub const fn named_decl(&self) -> Option<DeclId> {
        match self {
            Self::Named { decl, .. } => Some(*decl),
            _ => None,
        }
    }
}
