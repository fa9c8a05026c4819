//! Construction of models by front ends and tests.

use crate::decl::{
    Annotation, AnnotationValue, ConstructorDecl, ContainerDecl, DeclKind, Declaration,
    FieldDecl, MethodDecl, Parameter, TypeParamDecl, TypeRef, Visibility,
};
use crate::expr::{ExprKind, Expression, Literal};
use crate::ids::{DeclId, Element, ExprId, TypeParamId};
use crate::intern::TypeInterner;
use crate::model::Model;
use xinfer_common::Span;

/// Incremental model builder.
///
/// Members are created before their bodies so that bodies may reference any
/// member, including themselves and members declared later:
///
/// ```ignore
/// let mut b = ModelBuilder::new();
/// let list = b.container("List", None);
/// let size = b.method(list, "size", vec![], TypeRef::inferred(), None);
/// let call = b.call(size, None, vec![]);
/// b.set_body(size, call);
/// let model = b.build();
/// ```
///
/// Every element gets a distinct synthetic span unless one is set explicitly
/// with [`set_span`](Self::set_span).
pub struct ModelBuilder {
    decls: Vec<Declaration>,
    exprs: Vec<Expression>,
    type_params: Vec<TypeParamDecl>,
    top_level: Vec<DeclId>,
    file: u32,
    next_offset: u32,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self {
            decls: Vec::new(),
            exprs: Vec::new(),
            type_params: Vec::new(),
            top_level: Vec::new(),
            file: 0,
            next_offset: 0,
        }
    }

    /// Start assigning synthetic spans in another file.
    pub fn with_file(mut self, file: u32) -> Self {
        self.file = file;
        self
    }

    fn next_span(&mut self) -> Span {
        let start = self.next_offset;
        self.next_offset += 1;
        Span::new(self.file, start, start + 1)
    }

    fn push_decl(&mut self, name: &str, kind: DeclKind, declaring: Option<DeclId>) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        let span = self.next_span();
        self.decls.push(Declaration {
            name: name.into(),
            span,
            kind,
            declaring,
            visibility: Visibility::Public,
            is_static: false,
            annotations: Vec::new(),
        });
        match declaring {
            Some(container) => {
                if let DeclKind::Container(c) = &mut self.decls[container.index()].kind {
                    c.members.push(id);
                }
            }
            None => self.top_level.push(id),
        }
        id
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// A class-like container, top-level when `declaring` is `None`.
    pub fn container(&mut self, name: &str, declaring: Option<DeclId>) -> DeclId {
        self.push_decl(
            name,
            DeclKind::Container(ContainerDecl::default()),
            declaring,
        )
    }

    pub fn interface(&mut self, name: &str, declaring: Option<DeclId>) -> DeclId {
        let kind = DeclKind::Container(ContainerDecl {
            is_interface: true,
            ..ContainerDecl::default()
        });
        self.push_decl(name, kind, declaring)
    }

    pub fn set_supertype(&mut self, container: DeclId, supertype: crate::TypeExpr) {
        if let DeclKind::Container(c) = &mut self.decls[container.index()].kind {
            c.supertype = Some(supertype);
        }
    }

    /// Declare a type parameter on a container or method.
    pub fn type_param(&mut self, owner: DeclId, name: &str) -> TypeParamId {
        let id = TypeParamId(self.type_params.len() as u32);
        self.type_params.push(TypeParamDecl {
            name: name.into(),
            owner,
        });
        match &mut self.decls[owner.index()].kind {
            DeclKind::Container(c) => c.type_params.push(id),
            DeclKind::Method(m) => m.type_params.push(id),
            DeclKind::Field(_) | DeclKind::Constructor(_) => {}
        }
        id
    }

    pub fn field(
        &mut self,
        container: DeclId,
        name: &str,
        ty: TypeRef,
        initializer: Option<ExprId>,
    ) -> DeclId {
        let id = self.push_decl(
            name,
            DeclKind::Field(FieldDecl {
                ty,
                initializer: None,
            }),
            Some(container),
        );
        if let Some(initializer) = initializer {
            self.set_body(id, initializer);
        }
        id
    }

    pub fn constructor(
        &mut self,
        container: DeclId,
        params: Vec<Parameter>,
        body: Option<ExprId>,
    ) -> DeclId {
        let name = self.decls[container.index()].name.to_string();
        let id = self.push_decl(
            &name,
            DeclKind::Constructor(ConstructorDecl { params, body: None }),
            Some(container),
        );
        if let Some(body) = body {
            self.set_body(id, body);
        }
        id
    }

    pub fn method(
        &mut self,
        container: DeclId,
        name: &str,
        params: Vec<Parameter>,
        return_type: TypeRef,
        body: Option<ExprId>,
    ) -> DeclId {
        let id = self.push_decl(
            name,
            DeclKind::Method(MethodDecl {
                type_params: Vec::new(),
                params,
                return_type,
                body: None,
            }),
            Some(container),
        );
        if let Some(body) = body {
            self.set_body(id, body);
        }
        id
    }

    /// Attach the initializer or body of `member`.
    pub fn set_body(&mut self, member: DeclId, body: ExprId) {
        self.exprs[body.index()].owner = Some(member);
        match &mut self.decls[member.index()].kind {
            DeclKind::Field(field) => field.initializer = Some(body),
            DeclKind::Constructor(ctor) => ctor.body = Some(body),
            DeclKind::Method(method) => method.body = Some(body),
            DeclKind::Container(_) => {}
        }
    }

    pub fn set_static(&mut self, decl: DeclId, is_static: bool) {
        self.decls[decl.index()].is_static = is_static;
    }

    pub fn set_visibility(&mut self, decl: DeclId, visibility: Visibility) {
        self.decls[decl.index()].visibility = visibility;
    }

    pub fn set_span(&mut self, element: Element, span: Span) {
        match element {
            Element::Decl(decl) => self.decls[decl.index()].span = span,
            Element::Expr(expr) => self.exprs[expr.index()].span = span,
        }
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    pub fn annotate(&mut self, decl: DeclId, annotation: Annotation) {
        self.claim_annotation(decl, &annotation);
        self.decls[decl.index()].annotations.push(annotation);
    }

    /// Annotate parameter `index` of executable `decl`.
    pub fn annotate_param(&mut self, decl: DeclId, index: usize, annotation: Annotation) {
        self.claim_annotation(decl, &annotation);
        let params = match &mut self.decls[decl.index()].kind {
            DeclKind::Constructor(ctor) => &mut ctor.params,
            DeclKind::Method(method) => &mut method.params,
            DeclKind::Container(_) | DeclKind::Field(_) => return,
        };
        if let Some(param) = params.get_mut(index) {
            param.annotations.push(annotation);
        }
    }

    /// Annotation expressions belong to the annotated declaration.
    fn claim_annotation(&mut self, owner: DeclId, annotation: &Annotation) {
        if let Some(source) = annotation.source {
            self.exprs[source.index()].owner = Some(owner);
        }
        for value in &annotation.values {
            match value {
                AnnotationValue::Expressions(exprs) => {
                    for expr in exprs {
                        self.exprs[expr.index()].owner = Some(owner);
                    }
                }
                AnnotationValue::Nested(nested) => {
                    for inner in nested {
                        self.claim_annotation(owner, inner);
                    }
                }
                AnnotationValue::Constant => {}
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn expr(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        for child in kind.children() {
            self.exprs[child.index()].parent = Some(id);
        }
        let span = self.next_span();
        self.exprs.push(Expression {
            kind,
            span,
            parent: None,
            owner: None,
        });
        id
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Int(value)))
    }

    pub fn string(&mut self, value: &str) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Str(value.into())))
    }

    pub fn boolean(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Bool(value)))
    }

    pub fn null(&mut self) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Null))
    }

    pub fn call(&mut self, feature: DeclId, receiver: Option<ExprId>, args: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::FeatureCall {
            feature,
            receiver,
            args,
        })
    }

    pub fn this(&mut self) -> ExprId {
        self.expr(ExprKind::This)
    }

    pub fn super_ref(&mut self) -> ExprId {
        self.expr(ExprKind::Super)
    }

    pub fn param(&mut self, owner: DeclId, index: u32) -> ExprId {
        self.expr(ExprKind::Param { owner, index })
    }

    pub fn block(&mut self, exprs: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Block(exprs))
    }

    pub fn if_else(
        &mut self,
        condition: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    ) -> ExprId {
        self.expr(ExprKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn ret(&mut self, value: Option<ExprId>) -> ExprId {
        self.expr(ExprKind::Return(value))
    }

    pub fn build(self) -> Model {
        Model {
            decls: self.decls,
            exprs: self.exprs,
            type_params: self.type_params,
            top_level: self.top_level,
            types: TypeInterner::new(),
        }
    }
}
