//! Resolver configuration.

use xinfer_common::limits;

/// Knobs of a single [`RootResolver`](crate::RootResolver) run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    /// On reentrant dereference of an overriding method's inferred return
    /// type, hand out the overridden method's known return type instead of
    /// the top type, without a warning.
    pub overridden_return_type_hints: bool,
    /// Resolve unresolved members of other, not yet claimed roots with a
    /// nested resolver instead of falling back to the top type.
    pub resolve_foreign_roots: bool,
    pub stack_red_zone: usize,
    pub stack_growth: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            overridden_return_type_hints: true,
            resolve_foreign_roots: true,
            stack_red_zone: limits::STACK_RED_ZONE,
            stack_growth: limits::STACK_GROWTH,
        }
    }
}
