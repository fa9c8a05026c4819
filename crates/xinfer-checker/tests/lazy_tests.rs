use super::*;

fn demand() -> LazyType {
    LazyType::new(TypeProvider::Demand {
        member: DeclId(2),
        expr: ExprId(5),
        frame: FrameId(3),
        session: FeatureScopeSession::new(),
        return_type: true,
    })
}

#[test]
fn test_first_dereference_computes() {
    let mut lazy = demand();
    assert_eq!(lazy.state(), LazyState::Idle);
    assert_eq!(lazy.enter(), Dereference::Compute);
    assert_eq!(lazy.state(), LazyState::Computing);
    assert_eq!(lazy.activations(), 1);
    assert_eq!(lazy.provider().member(), DeclId(2));
}

#[test]
fn test_reentrant_dereference_leaves_state_alone() {
    let mut lazy = demand();
    lazy.enter();
    assert_eq!(lazy.enter(), Dereference::Reentrant);
    assert_eq!(lazy.enter(), Dereference::Reentrant);
    assert_eq!(lazy.state(), LazyState::Computing);

    // The in-flight computation still settles normally.
    assert!(lazy.resolve(TypeId::INT));
    assert_eq!(lazy.enter(), Dereference::Cached(TypeId::INT));
    assert_eq!(lazy.activations(), 1);
}

#[test]
fn test_resolution_is_first_occurrence_only() {
    let mut lazy = demand();
    assert!(lazy.start_computing());
    assert!(!lazy.start_computing());
    assert!(lazy.resolve(TypeId::STRING));
    assert!(!lazy.resolve(TypeId::INT));
    assert_eq!(lazy.value(), Some(TypeId::STRING));
}

#[test]
fn test_no_body_falls_back_permanently() {
    let mut lazy = LazyType::new(TypeProvider::NoBody { member: DeclId(9) });
    assert!(!lazy.start_computing());
    assert_eq!(lazy.enter(), Dereference::NoBody);
    assert_eq!(lazy.state(), LazyState::Fallback(TypeId::ANY));
    assert_eq!(lazy.enter(), Dereference::Cached(TypeId::ANY));
    assert!(!lazy.resolve(TypeId::INT));
    assert!(lazy.is_settled());
    assert_eq!(lazy.activations(), 0);
}
