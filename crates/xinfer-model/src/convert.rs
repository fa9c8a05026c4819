//! Conversion between raw type expressions and interned types, plus the
//! handful of structural operations the engine needs: substitution,
//! supertype views and branch joins.
//!
//! None of this is a unification solver. Type parameters are substituted,
//! never inferred, and joining two unrelated types simply yields `ANY`.

use crate::decl::DeclKind;
use crate::ids::{DeclId, TypeParamId};
use crate::model::Model;
use crate::types::{TypeData, TypeExpr, TypeId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use xinfer_common::limits::MAX_SUPERTYPE_DEPTH;

/// Source of type parameter bindings during conversion.
///
/// Implemented by the engine's resolved-type scope (declared type
/// parameters) and by plain substitution maps.
pub trait TypeParamBindings {
    fn bound_type(&self, param: TypeParamId) -> Option<TypeId>;
}

/// Bindings that bind nothing: every parameter converts to itself.
pub struct NoBindings;

impl TypeParamBindings for NoBindings {
    fn bound_type(&self, _param: TypeParamId) -> Option<TypeId> {
        None
    }
}

impl TypeParamBindings for FxHashMap<TypeParamId, TypeId> {
    fn bound_type(&self, param: TypeParamId) -> Option<TypeId> {
        self.get(&param).copied()
    }
}

impl Model {
    /// Convert a raw type expression into an interned type.
    pub fn to_lightweight(&self, expr: &TypeExpr, bindings: &dyn TypeParamBindings) -> TypeId {
        match expr {
            TypeExpr::Intrinsic(kind) => kind.type_id(),
            TypeExpr::Named { decl, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.to_lightweight(arg, bindings))
                    .collect();
                self.types.intern(TypeData::Named { decl: *decl, args })
            }
            TypeExpr::Param(param) => bindings
                .bound_type(*param)
                .unwrap_or_else(|| self.types.intern(TypeData::Param(*param))),
        }
    }

    /// Inverse of [`to_lightweight`](Self::to_lightweight).
    pub fn to_type_expr(&self, ty: TypeId) -> TypeExpr {
        match self.types.lookup(ty) {
            Some(TypeData::Intrinsic(kind)) => TypeExpr::Intrinsic(kind),
            Some(TypeData::Named { decl, args }) => TypeExpr::Named {
                decl,
                args: args.iter().map(|arg| self.to_type_expr(*arg)).collect(),
            },
            Some(TypeData::Param(param)) => TypeExpr::Param(param),
            None => TypeExpr::any(),
        }
    }

    /// The type of a type parameter itself.
    pub fn param_type(&self, param: TypeParamId) -> TypeId {
        self.types.intern(TypeData::Param(param))
    }

    /// `this` type of a container: the container applied to its own type
    /// parameters.
    pub fn this_type(&self, container: DeclId) -> TypeId {
        let args = self
            .decl(container)
            .type_params()
            .iter()
            .map(|param| self.param_type(*param))
            .collect();
        self.types.intern(TypeData::Named {
            decl: container,
            args,
        })
    }

    /// The supertype of `container` if it names a class-like container.
    ///
    /// Interfaces are never extended classes.
    pub fn extended_class(&self, container: DeclId) -> Option<&TypeExpr> {
        let supertype = self.decl(container).as_container()?.supertype.as_ref()?;
        let target = supertype.named_decl()?;
        match &self.decl(target).kind {
            DeclKind::Container(c) if !c.is_interface => Some(supertype),
            _ => None,
        }
    }

    /// Map from the type parameters of `decl` to `args`, position-wise.
    pub fn type_param_map(&self, decl: DeclId, args: &[TypeId]) -> FxHashMap<TypeParamId, TypeId> {
        self.decl(decl)
            .type_params()
            .iter()
            .copied()
            .zip(args.iter().copied())
            .collect()
    }

    /// Replace type parameters in `ty` according to `map`.
    pub fn substitute(&self, ty: TypeId, map: &FxHashMap<TypeParamId, TypeId>) -> TypeId {
        if map.is_empty() || ty.is_intrinsic() {
            return ty;
        }
        match self.types.lookup(ty) {
            Some(TypeData::Param(param)) => map.get(&param).copied().unwrap_or(ty),
            Some(TypeData::Named { decl, args }) => {
                let substituted: SmallVec<[TypeId; 2]> =
                    args.iter().map(|arg| self.substitute(*arg, map)).collect();
                if substituted == args {
                    return ty;
                }
                self.types.intern(TypeData::Named {
                    decl,
                    args: substituted,
                })
            }
            Some(TypeData::Intrinsic(_)) | None => ty,
        }
    }

    /// View `ty` as an instantiation of `target` by walking the extended-class
    /// chain of its declaration.
    ///
    /// `StringList extends AbstractList<String>` viewed as `AbstractList`
    /// yields `AbstractList<String>`. Returns `None` when `target` is not an
    /// ancestor (or the chain is cyclic / too deep).
    pub fn as_supertype(&self, ty: TypeId, target: DeclId) -> Option<TypeId> {
        let mut current = ty;
        for _ in 0..MAX_SUPERTYPE_DEPTH {
            let TypeData::Named { decl, args } = self.types.lookup(current)? else {
                return None;
            };
            if decl == target {
                return Some(current);
            }
            let supertype = self.extended_class(decl)?;
            let map = self.type_param_map(decl, &args);
            current = self.to_lightweight(supertype, &map);
        }
        None
    }

    /// Declaration named by `ty`, if it is a named type.
    pub fn named_decl(&self, ty: TypeId) -> Option<DeclId> {
        match self.types.lookup(ty)? {
            TypeData::Named { decl, .. } => Some(decl),
            _ => None,
        }
    }

    /// Join of two branch types.
    pub fn common_type(&self, a: TypeId, b: TypeId) -> TypeId {
        if a == b {
            return a;
        }
        if a == TypeId::NULL && self.named_decl(b).is_some() {
            return b;
        }
        if b == TypeId::NULL && self.named_decl(a).is_some() {
            return a;
        }
        if let Some(decl) = self.named_decl(b)
            && let Some(view) = self.as_supertype(a, decl)
            && view == b
        {
            return b;
        }
        if let Some(decl) = self.named_decl(a)
            && let Some(view) = self.as_supertype(b, decl)
            && view == a
        {
            return a;
        }
        TypeId::ANY
    }

    /// Source-level rendering of a type, for diagnostics and debugging.
    pub fn type_to_string(&self, ty: TypeId) -> String {
        match self.types.lookup(ty) {
            Some(TypeData::Intrinsic(kind)) => kind.name().to_string(),
            Some(TypeData::Named { decl, args }) => {
                let name = self.name(decl);
                if args.is_empty() {
                    return name.to_string();
                }
                let args: Vec<String> = args.iter().map(|arg| self.type_to_string(*arg)).collect();
                format!("{name}<{}>", args.join(", "))
            }
            Some(TypeData::Param(param)) => self.type_param(param).name.to_string(),
            None => format!("<unknown type {}>", ty.0),
        }
    }
}

#[cfg(test)]
#[path = "../tests/convert_tests.rs"]
mod tests;
