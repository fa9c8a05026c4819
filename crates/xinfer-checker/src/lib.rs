//! Demand-driven type resolution for declarations with inferred types.
//!
//! Fields and methods may leave their type out; it is then inferred from the
//! initializer or body, which may itself read other inferred members,
//! including ones declared later or ones reading it back. This crate
//! resolves all of them for one root container at a time:
//!
//! - **Scope** (`scope.rs`): stacked frames of resolved types with
//!   read-through lookup, reassignment and merge into the parent
//! - **Sessions** (`session.rs`): persistent environments binding `this`,
//!   `super` and the static/instance context
//! - **Placeholders** (`lazy.rs`): lazily computed inferred types that detect
//!   reentrant dereference
//! - **Preparation** (`prepare.rs`) and **computation** (`compute.rs`): the
//!   two passes over a root's containment tree
//! - **Typing** (`typing.rs`): the expression typing computation units run
//! - **Tracking** (`tracker.rs`): root membership shared between resolvers
//!
//! ```ignore
//! let tracker = RootedElements::new();
//! let result = resolve_root(&model, root, &tracker, ResolverOptions::default())?;
//! for diagnostic in result.diagnostics() {
//!     eprintln!("{}: {}", diagnostic.code, diagnostic.message);
//! }
//! ```

mod compute;
mod diagnostics;
mod error;
mod lazy;
mod options;
mod prepare;
mod resolver;
mod scope;
mod session;
mod tracker;
mod typing;

pub use compute::ComputationUnit;
pub use diagnostics::TypeDiagnostic;
pub use error::ResolveError;
pub use lazy::{Dereference, LazyState, LazyType, TypeProvider};
pub use options::ResolverOptions;
pub use resolver::{ResolutionResult, ResolutionStats, RootResolver, resolve_root};
pub use scope::{FrameId, ResolvedTypes, ScopeBindings, ScopeKey};
pub use session::{FeatureScopeSession, LocalElements, SUPER, THIS};
pub use tracker::RootedElements;
