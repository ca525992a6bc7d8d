//! Main orchestration logic.

use crate::cli::{Args, OutputFormat};
use crate::config::StoreLintConfig;
use crate::output::{CheckSummary, FormattedDiagnostic, Formatter};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use store_lint::{
    fix_source, lint_source, Diagnostic, DiagnosticCode, LintError, LintOptions, Severity,
    SourceKind,
};
use thiserror::Error;
use walkdir::WalkDir;

/// Patterns skipped in every workspace.
const DEFAULT_IGNORES: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/.git/**",
    "**/coverage/**",
];

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The workspace could not be resolved to a UTF-8 path.
    #[error("invalid workspace: {0}")]
    InvalidWorkspace(String),

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// A path given on the command line does not exist.
    #[error("no such file or directory: {0}")]
    MissingPath(Utf8PathBuf),

    /// Writing a fixed file failed.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lint result for one file.
struct FileResult {
    diagnostics: Vec<Diagnostic>,
    /// Fixed text, when at least one fix applied.
    output: Option<String>,
    fixes_applied: usize,
}

struct FileOutput {
    text: Option<String>,
    json: Vec<FormattedDiagnostic>,
    /// Path and fixed text for `--fix-dry-run`.
    dry_run: Option<(Utf8PathBuf, String)>,
    fixes_applied: usize,
}

/// Runs the linter over the workspace.
pub fn run(args: &Args) -> Result<CheckSummary, OrchestratorError> {
    let workspace = resolve_workspace(&args.workspace)?;

    // Load configuration
    let config = StoreLintConfig::load(&workspace);
    let options = config.lint_options(args.force_fix());
    let rule_severity = config.no_array_mutations_on_state.level.severity();

    let ignore_set = build_ignore_set(
        config
            .ignore
            .iter()
            .chain(&args.ignore)
            .map(String::as_str),
    )?;
    let extensions = config.file_extensions();
    let files = collect_files(&workspace, &args.paths, &extensions, &ignore_set)?;
    tracing::info!(%workspace, files = files.len(), fixing = args.fixing(), "linting");

    let formatter = Formatter::new(args.output);
    let output_json = args.output == OutputFormat::Json;
    let error_count = AtomicUsize::new(0);
    let warning_count = AtomicUsize::new(0);

    let outputs: Vec<Option<FileOutput>> = files
        .par_iter()
        .map(|file_path| -> Result<Option<FileOutput>, OrchestratorError> {
            let source = match fs::read_to_string(file_path) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("failed to read {}: {}", file_path, e);
                    return Ok(None);
                }
            };
            let Some(kind) = SourceKind::from_path(file_path.as_str()) else {
                tracing::debug!(path = %file_path, "unsupported file type, skipped");
                return Ok(None);
            };

            let mut result = check_file(&source, kind, &options, args.fixing());
            if let Some(severity) = rule_severity {
                for diag in &mut result.diagnostics {
                    if diag.code == DiagnosticCode::NoArrayMutationsOnState {
                        diag.severity = severity;
                    }
                }
            }

            let relative_path = file_path.strip_prefix(&workspace).unwrap_or(file_path);
            if args.fix {
                if let Some(fixed) = &result.output {
                    fs::write(file_path, fixed).map_err(|source| {
                        OrchestratorError::WriteFailed {
                            path: file_path.clone(),
                            source,
                        }
                    })?;
                    tracing::info!(path = %relative_path, fixes = result.fixes_applied, "wrote fixes");
                }
            }

            // Count errors and warnings
            for diag in &result.diagnostics {
                match diag.severity {
                    Severity::Error => {
                        error_count.fetch_add(1, Ordering::Relaxed);
                    }
                    Severity::Warning => {
                        warning_count.fetch_add(1, Ordering::Relaxed);
                    }
                    Severity::Hint => {}
                }
            }

            // Remaining diagnostics point into the fixed text.
            let text = result.output.as_deref().unwrap_or(&source);
            let diagnostics = &result.diagnostics;
            let formatted = if diagnostics.is_empty() || output_json {
                None
            } else {
                Some(formatter.format(diagnostics, relative_path, text))
            };
            let json = if output_json {
                Formatter::format_json_diagnostics(diagnostics, relative_path, text)
            } else {
                Vec::new()
            };
            let dry_run = if args.fix_dry_run {
                result
                    .output
                    .clone()
                    .map(|fixed| (relative_path.to_path_buf(), fixed))
            } else {
                None
            };

            Ok(Some(FileOutput {
                text: formatted,
                json,
                dry_run,
                fixes_applied: result.fixes_applied,
            }))
        })
        .collect::<Result<Vec<_>, OrchestratorError>>()?;

    let mut json_output = Vec::new();
    let mut fixed_count = 0;

    for output in outputs.into_iter().flatten() {
        fixed_count += output.fixes_applied;
        if let Some((path, fixed)) = output.dry_run {
            // Keep stdout valid JSON when diagnostics are printed as JSON.
            if output_json {
                eprintln!("=== fixed {} ===\n{}", path, fixed);
            } else {
                println!("=== fixed {} ===\n{}", path, fixed);
            }
        }
        if let Some(text) = output.text {
            print!("{}", text);
        }
        json_output.extend(output.json);
    }

    let summary = CheckSummary {
        file_count: files.len(),
        error_count: error_count.load(Ordering::Relaxed),
        warning_count: warning_count.load(Ordering::Relaxed),
        fixed_count,
        fail_on_warnings: args.fail_on_warnings,
    };

    // Print summary
    if output_json {
        let json = serde_json::to_string_pretty(&json_output).unwrap_or_else(|_| "[]".to_string());
        println!("{}", json);
    } else {
        println!("{}", summary.format());
    }

    Ok(summary)
}

/// Lints one document, applying fixes when `fixing` is set.
///
/// A document that does not parse yields a single `parse-error` diagnostic.
fn check_file(source: &str, kind: SourceKind, options: &LintOptions, fixing: bool) -> FileResult {
    let result = if fixing {
        fix_source(source, kind, options).map(|report| FileResult {
            output: (report.applied > 0).then_some(report.output),
            fixes_applied: report.applied,
            diagnostics: report.remaining,
        })
    } else {
        lint_source(source, kind, options).map(|diagnostics| FileResult {
            diagnostics,
            output: None,
            fixes_applied: 0,
        })
    };

    result.unwrap_or_else(|err| FileResult {
        diagnostics: vec![parse_error_diagnostic(&err)],
        output: None,
        fixes_applied: 0,
    })
}

fn parse_error_diagnostic(err: &LintError) -> Diagnostic {
    Diagnostic::new(DiagnosticCode::ParseError, err.to_string(), err.span())
}

fn resolve_workspace(workspace: &Utf8Path) -> Result<Utf8PathBuf, OrchestratorError> {
    if workspace.is_absolute() {
        return Ok(workspace.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|e| OrchestratorError::InvalidWorkspace(e.to_string()))?;
    let cwd = Utf8PathBuf::try_from(cwd)
        .map_err(|e| OrchestratorError::InvalidWorkspace(e.to_string()))?;
    Ok(cwd.join(workspace))
}

/// Builds the ignore set from user patterns plus [`DEFAULT_IGNORES`].
fn build_ignore_set<'a>(
    patterns: impl IntoIterator<Item = &'a str>,
) -> Result<GlobSet, OrchestratorError> {
    let mut ignore_builder = GlobSetBuilder::new();
    for pattern in patterns.into_iter().chain(DEFAULT_IGNORES.iter().copied()) {
        let glob = Glob::new(pattern).map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;
        ignore_builder.add(glob);
    }

    ignore_builder
        .build()
        .map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))
}

/// Finds the files to lint under `roots` (or the whole workspace), sorted.
fn collect_files(
    workspace: &Utf8Path,
    roots: &[Utf8PathBuf],
    extensions: &[&str],
    ignore_set: &GlobSet,
) -> Result<Vec<Utf8PathBuf>, OrchestratorError> {
    let roots: Vec<Utf8PathBuf> = if roots.is_empty() {
        vec![workspace.to_path_buf()]
    } else {
        roots.iter().map(|root| workspace.join(root)).collect()
    };

    let mut files = Vec::new();
    for root in roots {
        if !root.exists() {
            return Err(OrchestratorError::MissingPath(root));
        }
        files.extend(
            WalkDir::new(&root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
                .filter(|p| {
                    let file_name = p.file_name().unwrap_or("");
                    extensions.iter().any(|ext| file_name.ends_with(ext))
                })
                .filter(|p| {
                    let relative = p.strip_prefix(workspace).unwrap_or(p);
                    !ignore_set.is_match(relative.as_str())
                }),
        );
    }

    files.sort();
    files.dedup();
    Ok(files)
}
