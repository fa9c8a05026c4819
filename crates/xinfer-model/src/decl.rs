//! Declarations: containers and their members.

use crate::error::ModelError;
use crate::ids::{DeclId, ExprId, TypeParamId};
use crate::types::TypeExpr;
use std::sync::OnceLock;
use xinfer_common::Span;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A named entity of the model.
#[derive(Debug)]
pub struct Declaration {
    pub name: Box<str>,
    pub span: Span,
    pub kind: DeclKind,
    /// The container this declaration is a member of; `None` for top-level
    /// containers.
    pub declaring: Option<DeclId>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub annotations: Vec<Annotation>,
}

/// Closed set of declaration kinds.
#[derive(Debug)]
pub enum DeclKind {
    Container(ContainerDecl),
    Field(FieldDecl),
    Constructor(ConstructorDecl),
    Method(MethodDecl),
}

#[derive(Debug, Default)]
pub struct ContainerDecl {
    /// Members in declaration order, nested containers included.
    pub members: Vec<DeclId>,
    pub supertype: Option<TypeExpr>,
    pub type_params: Vec<TypeParamId>,
    pub is_interface: bool,
}

#[derive(Debug)]
pub struct FieldDecl {
    pub ty: TypeRef,
    pub initializer: Option<ExprId>,
}

#[derive(Debug, Default)]
pub struct ConstructorDecl {
    pub params: Vec<Parameter>,
    pub body: Option<ExprId>,
}

#[derive(Debug)]
pub struct MethodDecl {
    pub type_params: Vec<TypeParamId>,
    pub params: Vec<Parameter>,
    pub return_type: TypeRef,
    pub body: Option<ExprId>,
}

#[derive(Debug)]
pub struct Parameter {
    pub name: Box<str>,
    pub ty: TypeExpr,
    pub annotations: Vec<Annotation>,
}

impl Parameter {
    pub fn new(name: &str, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct TypeParamDecl {
    pub name: Box<str>,
    pub owner: DeclId,
}

/// Declared type of a field or method.
#[derive(Debug)]
pub enum TypeRef {
    Explicit(TypeExpr),
    /// Left out by the author; computed from the member's body.
    Inferred(InferredTypeRef),
}

impl TypeRef {
    pub fn inferred() -> Self {
        Self::Inferred(InferredTypeRef::default())
    }

    pub const fn is_inferred(&self) -> bool {
        matches!(self, Self::Inferred(_))
    }

    /// The declared type, or the written-back inferred type once resolved.
    pub fn known_type(&self) -> Option<&TypeExpr> {
        match self {
            Self::Explicit(ty) => Some(ty),
            Self::Inferred(inferred) => inferred.resolved(),
        }
    }
}

/// Write-once slot for an inferred type.
///
/// The slot transitions at most once from unresolved to resolved. It is
/// shared by every resolver working on the model, which is how members
/// resolved under one root are seen by resolvers of other roots.
#[derive(Debug, Default)]
pub struct InferredTypeRef {
    equivalent: OnceLock<TypeExpr>,
}

impl InferredTypeRef {
    pub fn resolved(&self) -> Option<&TypeExpr> {
        self.equivalent.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.equivalent.get().is_some()
    }

    pub(crate) fn resolve_to(&self, ty: TypeExpr) -> Result<(), TypeExpr> {
        self.equivalent.set(ty)
    }
}

impl Declaration {
    pub const fn is_container(&self) -> bool {
        matches!(self.kind, DeclKind::Container(_))
    }

    pub fn as_container(&self) -> Option<&ContainerDecl> {
        match &self.kind {
            DeclKind::Container(container) => Some(container),
            _ => None,
        }
    }

    /// Type parameters declared by this declaration itself.
    pub fn type_params(&self) -> &[TypeParamId] {
        match &self.kind {
            DeclKind::Container(container) => &container.type_params,
            DeclKind::Method(method) => &method.type_params,
            DeclKind::Field(_) | DeclKind::Constructor(_) => &[],
        }
    }

    pub fn params(&self) -> &[Parameter] {
        match &self.kind {
            DeclKind::Constructor(ctor) => &ctor.params,
            DeclKind::Method(method) => &method.params,
            DeclKind::Container(_) | DeclKind::Field(_) => &[],
        }
    }

    /// Field type or method return type.
    pub fn type_ref(&self) -> Option<&TypeRef> {
        match &self.kind {
            DeclKind::Field(field) => Some(&field.ty),
            DeclKind::Method(method) => Some(&method.return_type),
            DeclKind::Container(_) | DeclKind::Constructor(_) => None,
        }
    }

    pub fn inferred_type_ref(&self) -> Option<&InferredTypeRef> {
        match self.type_ref()? {
            TypeRef::Inferred(inferred) => Some(inferred),
            TypeRef::Explicit(_) => None,
        }
    }

    /// Field initializer, constructor or method body.
    pub fn body(&self) -> Option<ExprId> {
        match &self.kind {
            DeclKind::Field(field) => field.initializer,
            DeclKind::Constructor(ctor) => ctor.body,
            DeclKind::Method(method) => method.body,
            DeclKind::Container(_) => None,
        }
    }

    pub(crate) fn resolve_inferred(&self, id: DeclId, ty: TypeExpr) -> Result<(), ModelError> {
        let Some(inferred) = self.inferred_type_ref() else {
            return Err(ModelError::NotInferred {
                member: id,
                name: self.name.to_string(),
            });
        };
        inferred
            .resolve_to(ty)
            .map_err(|_| ModelError::AlreadyResolved {
                member: id,
                name: self.name.to_string(),
            })
    }
}

/// An annotation attached to a declaration or parameter.
#[derive(Debug)]
pub struct Annotation {
    pub annotation_type: DeclId,
    /// Separately modelled source element of the whole annotation; when
    /// present it is computed instead of walking `values`.
    pub source: Option<ExprId>,
    pub values: Vec<AnnotationValue>,
}

impl Annotation {
    pub fn new(annotation_type: DeclId) -> Self {
        Self {
            annotation_type,
            source: None,
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: AnnotationValue) -> Self {
        self.values.push(value);
        self
    }

    pub fn with_source(mut self, source: ExprId) -> Self {
        self.source = Some(source);
        self
    }
}

#[derive(Debug)]
pub enum AnnotationValue {
    /// Custom value given as expressions: `@Size(max = LIMIT * 2)`.
    Expressions(Vec<ExprId>),
    /// Annotation-typed value: `@Outer(inner = @Inner(...))`.
    Nested(Vec<Annotation>),
    /// Plain constant that needs no type computation.
    Constant,
}
