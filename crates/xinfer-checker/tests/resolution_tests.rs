//! End-to-end resolution of single roots.

mod support;

use support::{codes, resolve, resolve_with};
use xinfer_checker::{ResolveError, ResolverOptions, RootedElements, resolve_root};
use xinfer_common::{DiagnosticCategory, diagnostic_codes};
use xinfer_model::{
    DeclId, Element, Model, ModelBuilder, NoBindings, Parameter, TypeExpr, TypeId, TypeRef,
};

/// Type written back into the model for `decl`.
fn slot_type(model: &Model, decl: DeclId) -> Option<TypeId> {
    model
        .decl(decl)
        .type_ref()
        .and_then(TypeRef::known_type)
        .map(|ty| model.to_lightweight(ty, &NoBindings))
}

#[test]
fn test_forward_reference_sees_later_member() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let a = b.field(c, "a", TypeRef::inferred(), None);
    let field_b = b.field(c, "b", TypeRef::inferred(), None);
    let read_b = b.call(field_b, None, vec![]);
    b.set_body(a, read_b);
    let one = b.int(1);
    b.set_body(field_b, one);
    let model = b.build();

    let result = resolve(&model, c);

    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());
    assert_eq!(result.declared_type(a), Some(TypeId::INT));
    assert_eq!(result.declared_type(field_b), Some(TypeId::INT));
    assert_eq!(result.actual_type(read_b), Some(TypeId::INT));
    assert_eq!(
        model.decl(field_b).type_ref().and_then(TypeRef::known_type),
        Some(&TypeExpr::int())
    );
}

#[test]
fn test_each_member_is_computed_once() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let readers: Vec<_> = (0..3)
        .map(|i| b.method(c, &format!("reader{i}"), vec![], TypeRef::inferred(), None))
        .collect();
    let shared = b.method(c, "shared", vec![], TypeRef::inferred(), None);
    for &reader in &readers {
        let call = b.call(shared, None, vec![]);
        b.set_body(reader, call);
    }
    let text = b.string("x");
    b.set_body(shared, text);
    let model = b.build();

    let result = resolve(&model, c);
    let stats = result.stats();

    assert!(result.diagnostics().is_empty());
    for member in readers.iter().copied().chain([shared]) {
        assert_eq!(stats.body_computations.get(&member), Some(&1));
        assert_eq!(stats.placeholder_activations.get(&member), Some(&1));
        assert_eq!(result.declared_type(member), Some(TypeId::STRING));
    }
}

#[test]
fn test_no_body_falls_back_with_one_error() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let reader = b.field(c, "reader", TypeRef::inferred(), None);
    let missing = b.method(c, "missing", vec![], TypeRef::inferred(), None);
    let call = b.call(missing, None, vec![]);
    b.set_body(reader, call);
    let model = b.build();

    let result = resolve(&model, c);

    assert_eq!(codes(&result), vec![diagnostic_codes::CANNOT_INFER_TYPE]);
    let diagnostic = &result.diagnostics()[0];
    assert_eq!(diagnostic.element, Element::Decl(missing));
    assert_eq!(diagnostic.category, DiagnosticCategory::Error);
    assert_eq!(diagnostic.message, "Cannot infer type of 'missing'.");
    assert!(result.has_errors());

    assert_eq!(result.declared_type(missing), Some(TypeId::ANY));
    assert_eq!(result.declared_type(reader), Some(TypeId::ANY));
    // Fallback is not a resolution: the slot stays empty.
    assert!(!model.decl(missing).inferred_type_ref().is_some_and(|r| r.is_resolved()));
    assert!(model.decl(reader).inferred_type_ref().is_some_and(|r| r.is_resolved()));
}

#[test]
fn test_no_body_without_readers_still_reports() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let f = b.field(c, "f", TypeRef::inferred(), None);
    let model = b.build();

    let result = resolve(&model, c);

    assert_eq!(codes(&result), vec![diagnostic_codes::CANNOT_INFER_TYPE]);
    assert_eq!(result.diagnostics()[0].element, Element::Decl(f));
}

#[test]
fn test_method_return_type_joins_returns_and_trailing_value() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let flag = b.field(c, "flag", TypeRef::Explicit(TypeExpr::boolean()), None);
    let m = b.method(c, "m", vec![], TypeRef::inferred(), None);
    let cond = b.call(flag, None, vec![]);
    let null = b.null();
    let early = b.ret(Some(null));
    let guard = b.if_else(cond, early, None);
    let this = b.this();
    let last = b.ret(Some(this));
    let body = b.block(vec![guard, last]);
    b.set_body(m, body);
    let model = b.build();

    let result = resolve(&model, c);
    let c_type = model.this_type(c);

    assert!(result.diagnostics().is_empty());
    assert_eq!(result.return_type(body), Some(c_type));
    assert_eq!(result.declared_type(m), Some(c_type));
    assert_eq!(result.actual_type(guard), Some(TypeId::VOID));
    assert_eq!(result.actual_type(cond), Some(TypeId::BOOLEAN));
}

#[test]
fn test_if_else_joins_branches() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let f = b.field(c, "f", TypeRef::inferred(), None);
    let cond = b.boolean(true);
    let one = b.int(1);
    let text = b.string("one");
    let init = b.if_else(cond, one, Some(text));
    b.set_body(f, init);
    let model = b.build();

    let result = resolve(&model, c);
    assert_eq!(result.declared_type(f), Some(TypeId::ANY));
    assert!(result.diagnostics().is_empty());
}

#[test]
fn test_parameters_and_constructors() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let ctor = b.constructor(c, vec![Parameter::new("size", TypeExpr::int())], None);
    let size = b.param(ctor, 0);
    let ctor_body = b.block(vec![size]);
    b.set_body(ctor, ctor_body);
    let make = b.method(c, "make", vec![], TypeRef::inferred(), None);
    let arg = b.int(3);
    let call = b.call(ctor, None, vec![arg]);
    b.set_body(make, call);
    let model = b.build();

    let result = resolve(&model, c);

    assert!(result.diagnostics().is_empty());
    assert_eq!(result.actual_type(size), Some(TypeId::INT));
    assert_eq!(result.declared_type(ctor), Some(model.this_type(c)));
    assert_eq!(result.declared_type(make), Some(model.this_type(c)));
    assert_eq!(result.actual_type(arg), Some(TypeId::INT));
}

#[test]
fn test_this_in_static_context_is_top() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let s = b.method(c, "create", vec![], TypeRef::inferred(), None);
    b.set_static(s, true);
    let this = b.this();
    b.set_body(s, this);
    let i = b.method(c, "self_ref", vec![], TypeRef::inferred(), None);
    let this2 = b.this();
    b.set_body(i, this2);
    let model = b.build();

    let result = resolve(&model, c);

    assert_eq!(result.declared_type(s), Some(TypeId::ANY));
    assert_eq!(result.declared_type(i), Some(model.this_type(c)));
}

#[test]
fn test_explicit_types_are_kept() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let m = b.method(c, "m", vec![], TypeRef::Explicit(TypeExpr::string()), None);
    let one = b.int(1);
    b.set_body(m, one);
    let model = b.build();

    let result = resolve(&model, c);

    assert_eq!(result.declared_type(m), Some(TypeId::STRING));
    assert_eq!(result.return_type(one), Some(TypeId::INT));
    assert!(result.stats().placeholder_activations.is_empty());
}

#[test]
fn test_resolving_a_member_is_an_error() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let f = b.field(c, "f", TypeRef::inferred(), None);
    let model = b.build();

    let err = resolve_root(&model, f, &RootedElements::new(), ResolverOptions::default()).unwrap_err();
    assert_eq!(err, ResolveError::NotAContainer(f));
}

#[test]
fn test_results_are_deterministic() {
    fn build() -> (xinfer_model::Model, xinfer_model::DeclId) {
        let mut b = ModelBuilder::new();
        let c = b.container("C", None);
        let ping = b.method(c, "ping", vec![], TypeRef::inferred(), None);
        let pong = b.method(c, "pong", vec![], TypeRef::inferred(), None);
        let lost = b.field(c, "lost", TypeRef::inferred(), None);
        let inner = b.container("Inner", Some(c));
        let late = b.field(inner, "late", TypeRef::inferred(), None);
        let call_pong = b.call(pong, None, vec![]);
        b.set_body(ping, call_pong);
        let call_ping = b.call(ping, None, vec![]);
        b.set_body(pong, call_ping);
        let read_lost = b.call(lost, None, vec![]);
        b.set_body(late, read_lost);
        (b.build(), c)
    }

    let (first_model, first_root) = build();
    let (second_model, second_root) = build();
    let first = resolve(&first_model, first_root);
    let second = resolve(&second_model, second_root);

    let first_json = serde_json::to_string(first.diagnostics()).expect("serialize");
    let second_json = serde_json::to_string(second.diagnostics()).expect("serialize");
    assert_eq!(first_json, second_json);
    assert_eq!(
        codes(&first),
        vec![
            diagnostic_codes::CANNOT_INFER_TYPE_FROM_RECURSIVE_USAGE,
            diagnostic_codes::CANNOT_INFER_TYPE,
        ]
    );
    assert_eq!(first.stats(), second.stats());
}

#[test]
fn test_foreign_root_is_resolved_on_demand() {
    let mut b = ModelBuilder::new();
    let a = b.container("A", None);
    let field_a = b.field(a, "a", TypeRef::inferred(), None);
    let other = b.container("B", None);
    let method_b = b.method(other, "b", vec![], TypeRef::inferred(), None);
    let call = b.call(method_b, None, vec![]);
    b.set_body(field_a, call);
    let text = b.string("b");
    b.set_body(method_b, text);
    let model = b.build();

    let tracker = RootedElements::new();
    let result = resolve_root(&model, a, &tracker, ResolverOptions::default()).unwrap();

    assert!(result.diagnostics().is_empty());
    assert_eq!(result.declared_type(field_a), Some(TypeId::STRING));
    assert_eq!(result.stats().nested_roots, 1);
    assert!(tracker.contains(other));

    // B was resolved as part of A; resolving it again does nothing.
    let again = resolve_root(&model, other, &tracker, ResolverOptions::default()).unwrap();
    assert!(again.is_empty());
}

/// `A { f = B.g(); h() = 1 }  B { g() = A.h() }`
fn mutual_roots() -> (Model, [DeclId; 5]) {
    let mut b = ModelBuilder::new();
    let a = b.container("A", None);
    let f = b.field(a, "f", TypeRef::inferred(), None);
    let h = b.method(a, "h", vec![], TypeRef::inferred(), None);
    let other = b.container("B", None);
    let g = b.method(other, "g", vec![], TypeRef::inferred(), None);
    let call_g = b.call(g, None, vec![]);
    b.set_body(f, call_g);
    let one = b.int(1);
    b.set_body(h, one);
    let call_h = b.call(h, None, vec![]);
    b.set_body(g, call_h);
    (b.build(), [a, other, f, g, h])
}

#[test]
fn test_roots_reading_each_other_resolve_in_either_order() {
    let (model, [a, _, f, g, h]) = mutual_roots();
    let result = resolve(&model, a);
    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());
    assert_eq!(result.declared_type(f), Some(TypeId::INT));
    assert_eq!(result.declared_type(h), Some(TypeId::INT));
    assert_eq!(slot_type(&model, g), Some(TypeId::INT));
    assert_eq!(result.stats().nested_roots, 1);

    let (model, [_, other, f, g, h]) = mutual_roots();
    let result = resolve(&model, other);
    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());
    assert_eq!(result.declared_type(g), Some(TypeId::INT));
    assert_eq!(slot_type(&model, f), Some(TypeId::INT));
    assert_eq!(slot_type(&model, h), Some(TypeId::INT));
}

#[test]
fn test_cycle_across_roots_warns_once() {
    // A { f = B.g() }  B { g() = A.f }
    let mut b = ModelBuilder::new();
    let a = b.container("A", None);
    let f = b.field(a, "f", TypeRef::inferred(), None);
    let other = b.container("B", None);
    let g = b.method(other, "g", vec![], TypeRef::inferred(), None);
    let call_g = b.call(g, None, vec![]);
    b.set_body(f, call_g);
    let read_f = b.call(f, None, vec![]);
    b.set_body(g, read_f);
    let model = b.build();

    let result = resolve(&model, a);

    assert_eq!(codes(&result), vec![diagnostic_codes::CANNOT_INFER_TYPE_FROM_RECURSIVE_USAGE]);
    assert_eq!(result.diagnostics()[0].element, Element::Decl(f));
    assert_eq!(result.declared_type(f), Some(TypeId::ANY));
    assert_eq!(slot_type(&model, g), Some(TypeId::ANY));
}

#[test]
fn test_foreign_root_left_alone_when_disabled() {
    let mut b = ModelBuilder::new();
    let a = b.container("A", None);
    let field_a = b.field(a, "a", TypeRef::inferred(), None);
    let other = b.container("B", None);
    let method_b = b.method(other, "b", vec![], TypeRef::inferred(), None);
    let call = b.call(method_b, None, vec![]);
    b.set_body(field_a, call);
    let text = b.string("b");
    b.set_body(method_b, text);
    let model = b.build();

    let options = ResolverOptions {
        resolve_foreign_roots: false,
        ..ResolverOptions::default()
    };
    let result = resolve_with(&model, a, options);

    assert_eq!(codes(&result), vec![diagnostic_codes::CANNOT_INFER_TYPE_OUTSIDE_OF_ROOT]);
    assert_eq!(result.diagnostics()[0].element, Element::Decl(method_b));
    assert_eq!(
        result.diagnostics()[0].message,
        "Cannot infer type of 'b' outside of its root 'B'. Type 'Object' is used."
    );
    assert_eq!(result.declared_type(field_a), Some(TypeId::ANY));
    assert_eq!(result.stats().nested_roots, 0);
}

#[test]
fn test_overridden_return_type_answers_reentrant_call() {
    fn build() -> (xinfer_model::Model, xinfer_model::DeclId, xinfer_model::DeclId) {
        let mut b = ModelBuilder::new();
        let base = b.container("Base", None);
        b.method(base, "size", vec![], TypeRef::Explicit(TypeExpr::int()), None);
        let derived = b.container("Derived", None);
        b.set_supertype(derived, TypeExpr::named(base));
        let size = b.method(derived, "size", vec![], TypeRef::inferred(), None);
        let this = b.this();
        let again = b.call(size, Some(this), vec![]);
        b.set_body(size, again);
        (b.build(), derived, size)
    }

    let (model, derived, size) = build();
    let result = resolve(&model, derived);
    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());
    assert_eq!(result.declared_type(size), Some(TypeId::INT));
    assert_eq!(result.stats().override_hints, 1);

    let (model, derived, size) = build();
    let options = ResolverOptions {
        overridden_return_type_hints: false,
        ..ResolverOptions::default()
    };
    let result = resolve_with(&model, derived, options);
    assert_eq!(codes(&result), vec![diagnostic_codes::CANNOT_INFER_TYPE_FROM_RECURSIVE_USAGE]);
    assert_eq!(result.declared_type(size), Some(TypeId::ANY));
    assert_eq!(result.stats().reentrant_fallbacks, 1);
}

#[test]
fn test_unqualified_static_call_in_generic_container() {
    let mut b = ModelBuilder::new();
    let g = b.container("G", None);
    b.type_param(g, "T");
    let count = b.method(g, "count", vec![], TypeRef::inferred(), None);
    b.set_static(count, true);
    let one = b.int(1);
    b.set_body(count, one);
    let total = b.method(g, "total", vec![], TypeRef::inferred(), None);
    let call = b.call(count, None, vec![]);
    b.set_body(total, call);
    let model = b.build();

    let result = resolve(&model, g);

    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());
    assert_eq!(result.actual_type(call), Some(TypeId::INT));
    assert_eq!(result.declared_type(total), Some(TypeId::INT));
}
