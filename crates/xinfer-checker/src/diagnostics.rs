//! User-facing diagnostics produced during resolution.

use serde::Serialize;
use xinfer_common::{DiagnosticCategory, Span, format_message, get_diagnostic_message};
use xinfer_model::{Element, SourceElement};

/// A diagnostic attached to the model element it is about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeDiagnostic {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: String,
    pub element: Element,
    pub span: Span,
}

impl TypeDiagnostic {
    /// Build a diagnostic from its registered template.
    ///
    /// Codes without a template produce an error carrying the raw arguments,
    /// so a missing registration never loses the report.
    pub fn new(code: u32, source: SourceElement, args: &[&str]) -> Self {
        let (category, message) = match get_diagnostic_message(code) {
            Some(def) => (def.category, format_message(def.message, args)),
            None => (DiagnosticCategory::Error, args.join(" ")),
        };
        Self {
            code,
            category,
            message,
            element: source.element,
            span: source.span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}
