use super::*;
use xinfer_model::{ModelBuilder, TypeExpr};

fn resolver(model: &Model, root: DeclId) -> RootResolver<'_> {
    RootResolver::new(model, root, RootedElements::new(), ResolverOptions::default())
}

#[test]
fn test_computing_unprepared_member_is_an_error() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let f = b.field(c, "f", TypeRef::inferred(), None);
    let one = b.int(1);
    b.set_body(f, one);
    let model = b.build();
    let mut resolver = resolver(&model, c);

    assert_eq!(
        resolver.compute_member(f),
        Err(ResolveError::NoResolvedType {
            member: f,
            name: "f".to_string(),
        })
    );
    assert!(matches!(
        resolver.compute_container(c),
        Err(ResolveError::NoResolvedType { member, .. }) if member == c
    ));
    assert!(model.decl(f).inferred_type_ref().is_some_and(|r| !r.is_resolved()));
}

#[test]
fn test_member_claimed_elsewhere_is_skipped() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let f = b.field(c, "f", TypeRef::inferred(), None);
    let g = b.field(c, "g", TypeRef::inferred(), None);
    let one = b.int(1);
    b.set_body(f, one);
    let two = b.int(2);
    b.set_body(g, two);
    let model = b.build();
    let tracker = RootedElements::new();
    tracker.claim(f);
    let mut resolver = RootResolver::new(&model, c, tracker, ResolverOptions::default());

    assert!(resolver.prepare(&FeatureScopeSession::new()).unwrap());
    assert!(resolver.skipped.contains(&f));
    assert!(!resolver.prepared.contains_key(&f));

    resolver.compute_container(c).unwrap();
    assert!(model.decl(f).inferred_type_ref().is_some_and(|r| !r.is_resolved()));
    assert!(model.decl(g).inferred_type_ref().is_some_and(|r| r.is_resolved()));
}

#[test]
fn test_member_is_computed_once() {
    let mut b = ModelBuilder::new();
    let c = b.container("C", None);
    let f = b.field(c, "f", TypeRef::inferred(), None);
    let one = b.int(1);
    b.set_body(f, one);
    let model = b.build();
    let mut resolver = resolver(&model, c);
    resolver.prepare(&FeatureScopeSession::new()).unwrap();

    resolver.compute_member(f).unwrap();
    resolver.compute_member(f).unwrap();

    assert_eq!(resolver.stats.body_computations.get(&f), Some(&1));
    assert_eq!(resolver.prepared.get(&f).map(Option::is_some), Some(false));
}

#[test]
fn test_override_lookup_needs_a_bound_declaring_type() {
    let mut b = ModelBuilder::new();
    let base = b.container("Base", None);
    let base_size = b.method(base, "size", vec![], TypeRef::Explicit(TypeExpr::int()), None);
    let derived = b.container("Derived", None);
    b.set_supertype(derived, TypeExpr::named(base));
    let size = b.method(derived, "size", vec![], TypeRef::inferred(), None);
    let one = b.int(1);
    b.set_body(size, one);
    let model = b.build();
    let mut resolver = resolver(&model, derived);

    assert_eq!(
        resolver.overridden_return_type(size),
        Err(ResolveError::OverrideResolution {
            method: size,
            overridden: base_size,
        })
    );

    resolver.prepare(&FeatureScopeSession::new()).unwrap();
    assert_eq!(resolver.overridden_return_type(size), Ok(Some(TypeId::INT)));
    // Nothing overridden: no hint and no error.
    assert_eq!(resolver.overridden_return_type(base_size), Ok(None));
}
