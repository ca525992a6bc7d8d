//! Lint rules for Pinia/Vuex store definitions.
//!
//! The crate currently ships one rule, `no-array-mutations-on-state`, which
//! reports in-place array mutations (`sort`, `push`, ...) performed on store
//! state from inside `getters`, and can rewrite them to work on a
//! `structuredClone` copy.
//!
//! # Example
//!
//! ```
//! use store_lint::{lint_source, LintOptions, SourceKind};
//!
//! let source = "defineStore('s', { getters: { sorted: state => state.items.sort() } })";
//! let diagnostics = lint_source(source, SourceKind::Js, &LintOptions::all()).unwrap();
//!
//! for diagnostic in &diagnostics {
//!     println!("{}: {}", diagnostic.code, diagnostic.message);
//! }
//! assert_eq!(diagnostics.len(), 1);
//! ```

mod diagnostic;
mod error;
pub mod messages;
pub mod parse;
pub mod rules;

pub use diagnostic::{Diagnostic, DiagnosticCode, Fix, Severity};
pub use error::LintError;
pub use parse::{parse_document, DocumentText, ParsedDocument, SourceKind};
pub use rules::NoArrayMutationsOptions;

use source_span::apply_edits;
use swc_ecma_ast::Module;

/// Upper bound on fix passes over one document.
pub const MAX_FIX_PASSES: usize = 10;

/// Options for a lint run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintOptions {
    /// Settings for `no-array-mutations-on-state`; `None` turns the rule off.
    pub no_array_mutations_on_state: Option<NoArrayMutationsOptions>,
}

impl LintOptions {
    /// Returns options with every rule enabled at its default settings.
    pub fn all() -> Self {
        Self {
            no_array_mutations_on_state: Some(NoArrayMutationsOptions::default()),
        }
    }

    /// Turns fix generation on or off for every enabled rule.
    pub fn with_fix(mut self, enable_fix: bool) -> Self {
        if let Some(options) = &mut self.no_array_mutations_on_state {
            options.enable_fix = enable_fix;
        }
        self
    }
}

/// Runs all enabled rules over an already parsed module.
pub fn lint_module(module: &Module, doc: &DocumentText<'_>, options: &LintOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if let Some(rule_options) = options.no_array_mutations_on_state {
        diagnostics.extend(rules::no_array_mutations_on_state::check(
            module,
            doc,
            rule_options,
        ));
    }

    // Sort by position
    diagnostics.sort_by_key(|d| d.span.start);

    diagnostics
}

/// Parses `source` and runs all enabled rules over it.
pub fn lint_source(
    source: &str,
    kind: SourceKind,
    options: &LintOptions,
) -> Result<Vec<Diagnostic>, LintError> {
    let parsed = parse_document(source, kind)?;
    let doc = DocumentText::new(source, parsed.base);
    Ok(lint_module(&parsed.module, &doc, options))
}

/// Outcome of [`fix_source`].
#[derive(Debug, Clone)]
pub struct FixReport {
    /// The document after all fix passes.
    pub output: String,
    /// Number of edits applied across all passes.
    pub applied: usize,
    /// Number of passes that changed the document.
    pub passes: usize,
    /// Diagnostics still reported for `output`.
    pub remaining: Vec<Diagnostic>,
}

impl FixReport {
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Lints `source` and applies fixes until the output is stable.
///
/// Each pass applies every fix that does not overlap another one, then lints the
/// result again so deferred fixes get a fresh span. Stops after
/// [`MAX_FIX_PASSES`], when no fix applies, or when a pass produces text that no
/// longer parses, in which case that pass is discarded.
pub fn fix_source(
    source: &str,
    kind: SourceKind,
    options: &LintOptions,
) -> Result<FixReport, LintError> {
    let mut output = source.to_string();
    let mut diagnostics = lint_source(&output, kind, options)?;
    let mut applied = 0;
    let mut passes = 0;

    while passes < MAX_FIX_PASSES {
        let edits = diagnostics
            .iter()
            .filter_map(|d| d.fix.as_ref())
            .flat_map(|fix| fix.edits.iter());
        let outcome = apply_edits(&output, edits);
        if outcome.applied == 0 {
            break;
        }

        match lint_source(&outcome.text, kind, options) {
            Ok(next) => {
                tracing::debug!(
                    pass = passes + 1,
                    applied = outcome.applied,
                    deferred = outcome.skipped,
                    "applied fixes"
                );
                output = outcome.text;
                diagnostics = next;
                applied += outcome.applied;
                passes += 1;
            }
            Err(err) => {
                tracing::warn!(error = %err, "fixed output does not parse, discarding pass");
                break;
            }
        }
    }

    Ok(FixReport {
        output,
        applied,
        passes,
        remaining: diagnostics,
    })
}
