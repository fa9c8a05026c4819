//! Override lookup.

use crate::decl::{DeclKind, Visibility};
use crate::ids::DeclId;
use crate::model::Model;
use crate::types::TypeId;
use xinfer_common::limits::MAX_SUPERTYPE_DEPTH;

pub trait OverrideLookup {
    /// The nearest method in the extended-class chain of `method`'s declaring
    /// container that `method` overrides: same name, same arity, neither
    /// private nor static.
    fn overridden_method(&self, method: DeclId) -> Option<DeclId>;

    /// Return type of the method overridden by `method`, instantiated for
    /// `declaring_type` (the resolved `this` type of `method`'s container).
    ///
    /// `None` when nothing is overridden or the overridden return type is
    /// itself still unresolved.
    fn return_type_of_overridden(&self, method: DeclId, declaring_type: TypeId) -> Option<TypeId>;
}

fn is_overridable(model: &Model, id: DeclId) -> bool {
    let decl = model.decl(id);
    matches!(decl.kind, DeclKind::Method(_))
        && decl.visibility != Visibility::Private
        && !decl.is_static
}

impl OverrideLookup for Model {
    fn overridden_method(&self, method: DeclId) -> Option<DeclId> {
        let decl = self.decl(method);
        if !is_overridable(self, method) {
            return None;
        }
        let arity = decl.params().len();
        let mut container = decl.declaring?;
        for _ in 0..MAX_SUPERTYPE_DEPTH {
            container = self.extended_class(container)?.named_decl()?;
            let found = self.members(container).iter().copied().find(|candidate| {
                is_overridable(self, *candidate)
                    && self.name(*candidate) == &*decl.name
                    && self.decl(*candidate).params().len() == arity
            });
            if found.is_some() {
                return found;
            }
        }
        None
    }

    fn return_type_of_overridden(&self, method: DeclId, declaring_type: TypeId) -> Option<TypeId> {
        let overridden = self.overridden_method(method)?;
        let return_type = self.decl(overridden).type_ref()?.known_type()?;
        let overridden_container = self.decl(overridden).declaring?;
        let view = self.as_supertype(declaring_type, overridden_container)?;
        let args = match self.types.lookup(view)? {
            crate::TypeData::Named { args, .. } => args,
            _ => return None,
        };
        let map = self.type_param_map(overridden_container, &args);
        Some(self.to_lightweight(return_type, &map))
    }
}

#[cfg(test)]
#[path = "../tests/overrides_tests.rs"]
mod tests;
