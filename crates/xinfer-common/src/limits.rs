//! Centralized limits and thresholds for the type resolution engine.
//!
//! Resolution of a single root never recurses unboundedly: inference cycles
//! are cut by the reentrancy fallback of the lazy type placeholders. The
//! limits here only bound walks over front-end supplied structure, which may
//! itself be malformed (cyclic supertype chains, detached expression trees).

// =============================================================================
// Structural walks
// =============================================================================

/// Maximum number of extended-class hops followed when viewing a type as one
/// of its supertypes.
///
/// A cyclic `extends` chain is reported by the front end; the engine simply
/// stops walking and treats the target as not being a supertype.
pub const MAX_SUPERTYPE_DEPTH: u32 = 64;

/// Maximum number of parent hops when walking from an expression up to its
/// logical container.
pub const MAX_TREE_WALK_ITERATIONS: u32 = 10_000;

// =============================================================================
// Stack management
// =============================================================================

/// Remaining stack (in bytes) below which deep member/expression recursion
/// switches to a freshly allocated stack segment.
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// Size (in bytes) of each stack segment allocated once the red zone is hit.
pub const STACK_GROWTH: usize = 1024 * 1024;

// =============================================================================
// Capacity hints
// =============================================================================

/// Expected number of prepared members per root; used to pre-size the
/// member-to-frame map.
pub const PREPARED_MEMBERS_CAPACITY: usize = 16;
