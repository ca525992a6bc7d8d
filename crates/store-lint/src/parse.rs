//! Parsing front for the lint rules.
//!
//! Rules never parse. They receive a [`Module`] together with a [`DocumentText`],
//! which converts swc byte positions back to offsets into the original text.

use crate::LintError;
use source_span::Span;
use swc_common::{sync::Lrc, BytePos, FileName, SourceMap, Spanned};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{parse_file_as_module, EsSyntax, Syntax, TsSyntax};

/// The dialect a document is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    #[default]
    Js,
    Jsx,
    Ts,
    Tsx,
}

impl SourceKind {
    /// Picks a dialect from a file name, or `None` for files the linter skips.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit_once('.')?.1;
        match ext {
            "js" | "mjs" | "cjs" => Some(SourceKind::Js),
            "jsx" => Some(SourceKind::Jsx),
            "ts" | "mts" | "cts" => Some(SourceKind::Ts),
            "tsx" => Some(SourceKind::Tsx),
            _ => None,
        }
    }

    fn syntax(self) -> Syntax {
        match self {
            SourceKind::Js | SourceKind::Jsx => Syntax::Es(EsSyntax {
                jsx: self == SourceKind::Jsx,
                ..Default::default()
            }),
            SourceKind::Ts | SourceKind::Tsx => Syntax::Typescript(TsSyntax {
                tsx: self == SourceKind::Tsx,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

/// UTF-8 byte-order mark, which swc drops before assigning positions.
const BOM: char = '\u{feff}';

/// The original text of a parsed document and the position swc assigned to its
/// first byte.
#[derive(Debug, Clone, Copy)]
pub struct DocumentText<'a> {
    source: &'a str,
    base: BytePos,
    /// Bytes of `source` that precede swc's first position (a leading BOM).
    skipped: u32,
}

impl<'a> DocumentText<'a> {
    pub fn new(source: &'a str, base: BytePos) -> Self {
        let skipped = if source.starts_with(BOM) {
            BOM.len_utf8() as u32
        } else {
            0
        };
        Self {
            source,
            base,
            skipped,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Converts a swc span into byte offsets of this document.
    pub fn span(&self, span: swc_common::Span) -> Span {
        Span::new(
            span.lo.0.saturating_sub(self.base.0) + self.skipped,
            span.hi.0.saturating_sub(self.base.0) + self.skipped,
        )
    }

    /// Returns the exact source text of a swc span.
    pub fn text(&self, span: swc_common::Span) -> Option<&'a str> {
        if span.lo < self.base || span.hi < span.lo {
            return None;
        }
        self.span(span).slice(self.source)
    }
}

/// A parsed document.
pub struct ParsedDocument {
    pub module: Module,
    /// Position swc assigned to byte 0 of the source.
    pub base: BytePos,
}

/// Parses `source` as a module of the given dialect.
pub fn parse_document(source: &str, kind: SourceKind) -> Result<ParsedDocument, LintError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(Lrc::new(FileName::Anon), source.to_string());
    let base = fm.start_pos;

    let mut recovered = Vec::new();
    let module = parse_file_as_module(&fm, kind.syntax(), EsVersion::Es2022, None, &mut recovered)
        .map_err(|e| {
            let doc = DocumentText::new(source, base);
            LintError::Parse {
                message: e.kind().msg().to_string(),
                span: doc.span(e.span()),
            }
        })?;

    if !recovered.is_empty() {
        tracing::debug!(count = recovered.len(), "parser recovered from errors");
    }

    Ok(ParsedDocument { module, base })
}
