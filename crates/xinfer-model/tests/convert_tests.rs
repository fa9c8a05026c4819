use super::*;
use crate::builder::ModelBuilder;

struct Generics {
    model: Model,
    g: DeclId,
    t: TypeParamId,
    x: DeclId,
    z: DeclId,
    i: DeclId,
}

/// `G<T>`, `X extends G<String>`, `Z extends X`, interface `I`.
fn generics() -> Generics {
    let mut b = ModelBuilder::new();
    let g = b.container("G", None);
    let t = b.type_param(g, "T");
    let x = b.container("X", None);
    b.set_supertype(x, TypeExpr::generic(g, vec![TypeExpr::string()]));
    let z = b.container("Z", None);
    b.set_supertype(z, TypeExpr::named(x));
    let i = b.interface("I", None);
    let model = b.build();
    Generics { model, g, t, x, z, i }
}

#[test]
fn test_to_lightweight_binds_parameters() {
    let Generics { model, g, t, .. } = generics();
    let expr = TypeExpr::generic(g, vec![TypeExpr::Param(t)]);

    let open = model.to_lightweight(&expr, &NoBindings);
    assert_eq!(open, model.this_type(g));
    assert_eq!(model.type_to_string(open), "G<T>");

    let mut bindings = FxHashMap::default();
    bindings.insert(t, TypeId::INT);
    let closed = model.to_lightweight(&expr, &bindings);
    assert_eq!(model.type_to_string(closed), "G<int>");
    assert_eq!(model.to_type_expr(closed), TypeExpr::generic(g, vec![TypeExpr::int()]));
}

#[test]
fn test_substitute_rewrites_nested_parameters() {
    let Generics { model, g, t, .. } = generics();
    let nested = TypeExpr::generic(g, vec![TypeExpr::generic(g, vec![TypeExpr::Param(t)])]);
    let ty = model.to_lightweight(&nested, &NoBindings);

    let map = model.type_param_map(g, &[TypeId::STRING]);
    let substituted = model.substitute(ty, &map);
    assert_eq!(model.type_to_string(substituted), "G<G<String>>");
    // Nothing to substitute: same id back.
    assert_eq!(model.substitute(substituted, &map), substituted);
    assert_eq!(model.substitute(TypeId::INT, &map), TypeId::INT);
}

#[test]
fn test_as_supertype_instantiates_ancestors() {
    let Generics { model, g, x, z, .. } = generics();
    let g_of_string = model.to_lightweight(&TypeExpr::generic(g, vec![TypeExpr::string()]), &NoBindings);

    assert_eq!(model.as_supertype(model.this_type(x), g), Some(g_of_string));
    assert_eq!(model.as_supertype(model.this_type(z), g), Some(g_of_string));
    assert_eq!(model.as_supertype(model.this_type(z), x), Some(model.this_type(x)));
    assert_eq!(model.as_supertype(model.this_type(x), z), None);
    assert_eq!(model.as_supertype(TypeId::STRING, g), None);
}

#[test]
fn test_interfaces_are_not_extended_classes() {
    let mut b = ModelBuilder::new();
    let i = b.interface("I", None);
    let c = b.container("C", None);
    b.set_supertype(c, TypeExpr::named(i));
    let model = b.build();

    assert_eq!(model.extended_class(c), None);
    assert_eq!(model.as_supertype(model.this_type(c), i), None);
}

#[test]
fn test_cyclic_supertype_chain_terminates() {
    let mut b = ModelBuilder::new();
    let a = b.container("A", None);
    let c = b.container("C", None);
    b.set_supertype(a, TypeExpr::named(c));
    b.set_supertype(c, TypeExpr::named(a));
    let unrelated = b.container("U", None);
    let model = b.build();

    assert_eq!(model.as_supertype(model.this_type(a), unrelated), None);
}

#[test]
fn test_common_type() {
    let Generics { model, g, x, z, i, .. } = generics();
    let g_of_string = model.to_lightweight(&TypeExpr::generic(g, vec![TypeExpr::string()]), &NoBindings);
    let x_ty = model.this_type(x);
    let z_ty = model.this_type(z);

    assert_eq!(model.common_type(TypeId::INT, TypeId::INT), TypeId::INT);
    assert_eq!(model.common_type(TypeId::INT, TypeId::STRING), TypeId::ANY);
    assert_eq!(model.common_type(TypeId::NULL, x_ty), x_ty);
    assert_eq!(model.common_type(x_ty, TypeId::NULL), x_ty);
    assert_eq!(model.common_type(TypeId::NULL, TypeId::INT), TypeId::ANY);
    assert_eq!(model.common_type(z_ty, x_ty), x_ty);
    assert_eq!(model.common_type(x_ty, g_of_string), g_of_string);
    assert_eq!(model.common_type(model.this_type(i), x_ty), TypeId::ANY);
}

#[test]
fn test_type_to_string_of_intrinsics() {
    let Generics { model, .. } = generics();
    assert_eq!(model.type_to_string(TypeId::ANY), "Object");
    assert_eq!(model.type_to_string(TypeId::VOID), "void");
    assert_eq!(model.to_type_expr(TypeId::BOOLEAN), TypeExpr::boolean());
}
