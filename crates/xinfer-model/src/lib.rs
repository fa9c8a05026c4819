//! Declaration model and lightweight types for the xinfer engine.
//!
//! Everything the type resolution engine consumes from its collaborators
//! lives here:
//!
//! - **Declarations**: containers and their members (fields, constructors,
//!   methods), with explicit or inferred type references
//! - **Expressions**: the bodies and annotation values types are inferred from
//! - **Lightweight types**: interned `TypeId`s with O(1) equality
//! - **Conversion**: raw `TypeExpr` <-> `TypeId`, substitution, supertype views
//! - **Associations**: member -> body expression, element -> logical container
//! - **Override lookup**: the method a method overrides and its return type
//!
//! Models are built once by a front end through [`ModelBuilder`] and then only
//! mutated by the engine writing resolved types into inferred type slots.

mod associations;
mod builder;
mod convert;
mod decl;
mod error;
mod expr;
mod ids;
mod intern;
mod model;
mod overrides;
mod types;

pub use associations::{LogicalContainerProvider, SourceElement};
pub use builder::ModelBuilder;
pub use convert::{NoBindings, TypeParamBindings};
pub use decl::{
    Annotation, AnnotationValue, ConstructorDecl, ContainerDecl, DeclKind, Declaration,
    FieldDecl, InferredTypeRef, MethodDecl, Parameter, TypeParamDecl, TypeRef, Visibility,
};
pub use error::ModelError;
pub use expr::{ExprKind, Expression, Literal};
pub use ids::{DeclId, Element, ExprId, TypeParamId};
pub use intern::TypeInterner;
pub use model::Model;
pub use overrides::OverrideLookup;
pub use types::{IntrinsicKind, TypeData, TypeExpr, TypeId};
