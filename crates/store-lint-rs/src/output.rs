//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8Path;
use serde::Serialize;
use source_span::{LineCol, LineIndex};
use store_lint::{Diagnostic, Severity};

/// A formatted diagnostic for output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// The diagnostic type (Error, Warning, etc.).
    #[serde(rename = "type")]
    pub diagnostic_type: String,
    /// The file path.
    pub filename: String,
    /// The start position.
    pub start: Position,
    /// The end position.
    pub end: Position,
    /// The message.
    pub message: String,
    /// The diagnostic code (rule name or `parse-error`).
    pub code: String,
    /// Whether a fix is attached.
    pub fixable: bool,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
        Severity::Hint => "Hint",
    }
}

/// Formats diagnostics for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a collection of diagnostics.
    pub fn format(&self, diagnostics: &[Diagnostic], file_path: &Utf8Path, source: &str) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(diagnostics, file_path, source),
            OutputFormat::HumanVerbose => self.format_human_verbose(diagnostics, file_path, source),
            OutputFormat::Json => self.format_json(diagnostics, file_path, source),
            OutputFormat::Machine => self.format_machine(diagnostics, file_path, source),
        }
    }

    fn format_human(
        &self,
        diagnostics: &[Diagnostic],
        file_path: &Utf8Path,
        source: &str,
    ) -> String {
        let line_index = LineIndex::new(source);
        let mut output = String::new();

        for diag in diagnostics {
            let start = line_index.line_col(diag.span.start).unwrap_or_default();
            let fixable = if diag.is_fixable() { " [fixable]" } else { "" };

            output.push_str(&format!(
                "{}:{}:{}\n{}: {} ({}){}\n\n",
                file_path,
                start.line + 1,
                start.col + 1,
                severity_label(diag.severity),
                diag.message,
                diag.code,
                fixable
            ));
        }

        output
    }

    /// Formats as human-readable output with code snippets.
    fn format_human_verbose(
        &self,
        diagnostics: &[Diagnostic],
        file_path: &Utf8Path,
        source: &str,
    ) -> String {
        let line_index = LineIndex::new(source);
        let mut output = String::new();

        for diag in diagnostics {
            let (start, end) = line_index.span_bounds(diag.span);

            output.push_str(&format!(
                "{}:{}:{}\n{}: {} ({})\n",
                file_path,
                start.line + 1,
                start.col + 1,
                severity_label(diag.severity),
                diag.message,
                diag.code
            ));

            if let Some(line) = line_index.line_text(source, start.line) {
                let gutter = (start.line + 1).to_string();
                output.push_str(&format!("  {} | {}\n", gutter, line));

                // Underline the span, or a single caret for spans across lines.
                let width = if end.line == start.line {
                    end.col.saturating_sub(start.col).max(1)
                } else {
                    1
                };
                output.push_str(&format!(
                    "  {} | {}{}\n",
                    " ".repeat(gutter.len()),
                    " ".repeat(start.col as usize),
                    "^".repeat(width as usize)
                ));
            }

            if let Some(fix) = &diag.fix {
                output.push_str(&format!("  fix: {}\n", fix.message));
            }

            output.push('\n');
        }

        output
    }

    fn format_json(
        &self,
        diagnostics: &[Diagnostic],
        file_path: &Utf8Path,
        source: &str,
    ) -> String {
        let formatted = Self::format_json_diagnostics(diagnostics, file_path, source);
        serde_json::to_string_pretty(&formatted).unwrap_or_default()
    }

    /// Formats diagnostics into JSON-ready structs.
    pub fn format_json_diagnostics(
        diagnostics: &[Diagnostic],
        file_path: &Utf8Path,
        source: &str,
    ) -> Vec<FormattedDiagnostic> {
        let line_index = LineIndex::new(source);
        diagnostics
            .iter()
            .map(|diag| {
                let (start, end) = line_index.span_bounds(diag.span);

                FormattedDiagnostic {
                    diagnostic_type: severity_label(diag.severity).to_string(),
                    filename: file_path.to_string(),
                    start: position(start, u32::from(diag.span.start)),
                    end: position(end, u32::from(diag.span.end)),
                    message: diag.message.clone(),
                    code: diag.code.to_string(),
                    fixable: diag.is_fixable(),
                }
            })
            .collect()
    }

    /// Formats as machine-readable output.
    fn format_machine(
        &self,
        diagnostics: &[Diagnostic],
        file_path: &Utf8Path,
        source: &str,
    ) -> String {
        let line_index = LineIndex::new(source);
        let mut output = String::new();

        for diag in diagnostics {
            let (start, end) = line_index.span_bounds(diag.span);

            let severity = match diag.severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARNING",
                Severity::Hint => "HINT",
            };

            output.push_str(&format!(
                "{} {}:{}:{}:{}:{} {} ({})\n",
                severity,
                file_path,
                start.line + 1,
                start.col + 1,
                end.line + 1,
                end.col + 1,
                diag.message,
                diag.code
            ));
        }

        output
    }
}

fn position(pos: LineCol, offset: u32) -> Position {
    Position {
        line: pos.line + 1,
        column: pos.col + 1,
        offset,
    }
}

/// Summary of a lint run.
#[derive(Debug, Default)]
pub struct CheckSummary {
    /// Number of files checked.
    pub file_count: usize,
    /// Number of errors.
    pub error_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Number of fixes applied (or that would be applied in a dry run).
    pub fixed_count: usize,
    /// Whether to fail on warnings.
    pub fail_on_warnings: bool,
}

fn plural(count: usize, singular: &str, many: &str) -> String {
    let word = if count == 1 { singular } else { many };
    format!("{} {}", count, word)
}

impl CheckSummary {
    /// Returns whether the run should exit with a failure status.
    pub fn failed(&self) -> bool {
        self.error_count > 0 || (self.warning_count > 0 && self.fail_on_warnings)
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        let mut summary = format!(
            "====================================\nstore-lint found {} and {} in {}",
            plural(self.error_count, "error", "errors"),
            plural(self.warning_count, "warning", "warnings"),
            plural(self.file_count, "file", "files")
        );
        if self.fixed_count > 0 {
            summary.push_str(&format!(" ({} applied)", plural(self.fixed_count, "fix", "fixes")));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use source_span::{Span, TextEdit};
    use store_lint::{DiagnosticCode, Fix};

    const SOURCE: &str = "const s = {\n  getters: { a: state => state.items.sort() },\n};\n";

    fn sort_diagnostic() -> Diagnostic {
        let start = SOURCE.find("sort").unwrap() as u32;
        Diagnostic::new(
            DiagnosticCode::NoArrayMutationsOnState,
            "Avoid calling `sort()`",
            Span::new(start, start + 4),
        )
    }

    #[test]
    fn test_format_human() {
        let formatter = Formatter::new(OutputFormat::Human);
        let output = formatter.format(&[sort_diagnostic()], Utf8Path::new("store.js"), SOURCE);
        assert_eq!(
            output,
            "store.js:2:38\nError: Avoid calling `sort()` (no-array-mutations-on-state)\n\n"
        );
    }

    #[test]
    fn test_format_human_verbose() {
        let formatter = Formatter::new(OutputFormat::HumanVerbose);
        let start = SOURCE.find("state.items").unwrap() as u32;
        let diag = sort_diagnostic().with_fix(Fix::new(
            "Copy `state.items` with structuredClone()",
            vec![TextEdit::new(
                Span::new(start, start + 11),
                "structuredClone(state.items)",
            )],
        ));

        let output = formatter.format(&[diag], Utf8Path::new("store.js"), SOURCE);
        insta::assert_snapshot!(output.trim_end(), @r###"
        store.js:2:38
        Error: Avoid calling `sort()` (no-array-mutations-on-state)
          2 |   getters: { a: state => state.items.sort() },
            |                                      ^^^^
          fix: Copy `state.items` with structuredClone()
        "###);
    }

    #[test]
    fn test_format_json() {
        let diagnostics = Formatter::format_json_diagnostics(
            &[sort_diagnostic()],
            Utf8Path::new("store.js"),
            SOURCE,
        );
        assert_eq!(diagnostics.len(), 1);
        let diag = &diagnostics[0];
        assert_eq!(diag.diagnostic_type, "Error");
        assert_eq!((diag.start.line, diag.start.column), (2, 38));
        assert_eq!((diag.end.line, diag.end.column), (2, 42));
        assert!(!diag.fixable);

        let output = Formatter::new(OutputFormat::Json).format(
            &[sort_diagnostic()],
            Utf8Path::new("store.js"),
            SOURCE,
        );
        assert!(output.contains("\"type\": \"Error\""));
        assert!(output.contains("\"code\": \"no-array-mutations-on-state\""));
    }

    #[test]
    fn test_format_machine() {
        let formatter = Formatter::new(OutputFormat::Machine);
        let output = formatter.format(&[sort_diagnostic()], Utf8Path::new("store.js"), SOURCE);
        assert_eq!(
            output,
            "ERROR store.js:2:38:2:42 Avoid calling `sort()` (no-array-mutations-on-state)\n"
        );
    }

    #[test]
    fn test_summary() {
        let summary = CheckSummary {
            file_count: 5,
            error_count: 2,
            warning_count: 1,
            fixed_count: 0,
            fail_on_warnings: false,
        };

        assert_eq!(
            summary.format(),
            "====================================\nstore-lint found 2 errors and 1 warning in 5 files"
        );
        assert!(summary.failed());
    }

    #[test]
    fn test_summary_failure() {
        let mut summary = CheckSummary {
            file_count: 1,
            warning_count: 1,
            fixed_count: 3,
            ..Default::default()
        };
        assert!(!summary.failed());
        assert!(summary.format().ends_with("in 1 file (3 fixes applied)"));

        summary.fail_on_warnings = true;
        assert!(summary.failed());
    }
}
