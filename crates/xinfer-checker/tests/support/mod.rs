//! Shared helpers for the resolver integration tests.

#![allow(dead_code)]

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use xinfer_checker::{ResolutionResult, ResolverOptions, RootedElements, resolve_root};
use xinfer_model::{DeclId, Model};

static INIT: Once = Once::new();

/// Install a test-writer subscriber when `XINFER_LOG` (or `RUST_LOG`) is set.
///
/// `XINFER_LOG_FORMAT=json` switches to one JSON object per event.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = match std::env::var("XINFER_LOG") {
            Ok(directives) => EnvFilter::builder().parse_lossy(directives),
            Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
            Err(_) => return,
        };
        let json = std::env::var("XINFER_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
        let builder = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer();
        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}

/// Resolve `root` with default options and a fresh tracker.
pub fn resolve(model: &Model, root: DeclId) -> ResolutionResult {
    resolve_with(model, root, ResolverOptions::default())
}

pub fn resolve_with(model: &Model, root: DeclId, options: ResolverOptions) -> ResolutionResult {
    init_tracing();
    resolve_root(model, root, &RootedElements::new(), options).expect("resolution succeeds")
}

pub fn codes(result: &ResolutionResult) -> Vec<u32> {
    result.diagnostics().iter().map(|d| d.code).collect()
}
