//! Library error type.

use source_span::Span;
use thiserror::Error;

/// Errors raised while linting a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintError {
    /// The document could not be parsed as JavaScript/TypeScript.
    #[error("{message}")]
    Parse {
        /// The parser's message.
        message: String,
        /// Where the parser gave up.
        span: Span,
    },
}

impl LintError {
    /// Returns the source location the error points at.
    pub fn span(&self) -> Span {
        match self {
            LintError::Parse { span, .. } => *span,
        }
    }
}
