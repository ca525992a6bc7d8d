//! Diagnostics and autofixes for violations.

use super::detect::Violation;
use crate::messages::{self, NO_ARRAY_MUTATIONS_ON_STATE};
use crate::parse::DocumentText;
use crate::{Diagnostic, DiagnosticCode, Fix};
use source_span::TextEdit;

/// Global used to copy the receiver before it is mutated.
///
/// Available in browsers and Node 17+; it copies nested arrays and objects so the
/// result shares nothing with the store.
pub const DEEP_COPY_FN: &str = "structuredClone";

/// Builds the diagnostic for `violation`, anchored at the method name.
///
/// With `fix_enabled` the diagnostic carries one edit that wraps the receiver in
/// [`DEEP_COPY_FN`]. If the receiver's text cannot be recovered the diagnostic
/// is still reported, just without a fix.
pub fn emit(violation: &Violation, fix_enabled: bool, doc: &DocumentText<'_>) -> Diagnostic {
    let message = messages::render(
        NO_ARRAY_MUTATIONS_ON_STATE,
        &[("method", violation.method.as_str())],
    );
    let diagnostic = Diagnostic::new(
        DiagnosticCode::NoArrayMutationsOnState,
        message,
        doc.span(violation.method_span),
    );

    if !fix_enabled {
        return diagnostic;
    }

    match doc.text(violation.receiver) {
        Some(receiver) => {
            let edit = TextEdit::new(
                doc.span(violation.receiver),
                format!("{DEEP_COPY_FN}({receiver})"),
            );
            let description = format!(
                "Copy `{receiver}` with {DEEP_COPY_FN}() before calling `{}()`",
                violation.method
            );
            diagnostic.with_fix(Fix::new(description, vec![edit]))
        }
        None => {
            tracing::warn!(method = %violation.method, "receiver text unavailable, fix dropped");
            diagnostic
        }
    }
}
