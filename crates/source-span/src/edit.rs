//! Span-based text replacement.

use crate::Span;

/// Replaces the text covered by `span` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }
}

/// Result of splicing a batch of edits into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// The rewritten document.
    pub text: String,
    /// Number of edits that were spliced in.
    pub applied: usize,
    /// Edits left out because they overlapped an earlier edit or had a span
    /// that does not fit the document.
    pub skipped: usize,
}

/// Applies every non-overlapping edit to `source`.
///
/// Edits are taken in start order; an edit that overlaps one already accepted is
/// skipped rather than merged, so callers that want it applied have to re-run
/// their analysis on the output and try again.
pub fn apply_edits<'a, I>(source: &str, edits: I) -> EditOutcome
where
    I: IntoIterator<Item = &'a TextEdit>,
{
    let mut edits: Vec<&TextEdit> = edits.into_iter().collect();
    edits.sort_by_key(|edit| (edit.span.start, edit.span.end));

    let mut text = String::with_capacity(source.len());
    let mut cursor = 0usize;
    let mut last: Option<Span> = None;
    let mut applied = 0;
    let mut skipped = 0;

    for edit in edits {
        let start = usize::from(edit.span.start);
        let end = usize::from(edit.span.end);

        let fits = edit.span.slice(source).is_some();
        let clashes = last.is_some_and(|prev| prev.overlaps(edit.span) || start < cursor);
        if !fits || clashes {
            skipped += 1;
            continue;
        }

        text.push_str(&source[cursor..start]);
        text.push_str(&edit.replacement);
        cursor = end;
        last = Some(edit.span);
        applied += 1;
    }

    text.push_str(&source[cursor..]);

    EditOutcome {
        text,
        applied,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wrap(source: &str, target: &str) -> TextEdit {
        let start = source.find(target).unwrap() as u32;
        let span = Span::new(start, start + target.len() as u32);
        TextEdit::new(span, format!("structuredClone({target})"))
    }

    #[test]
    fn test_single_edit_keeps_tail() {
        let source = "state => state.items.sort((a, b) => a - b)";
        let outcome = apply_edits(source, &[wrap(source, "state.items")]);
        assert_eq!(
            outcome.text,
            "state => structuredClone(state.items).sort((a, b) => a - b)"
        );
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_disjoint_edits_in_any_order() {
        let source = "state.a.push(state.b.pop())";
        let edits = [wrap(source, "state.b"), wrap(source, "state.a")];
        let outcome = apply_edits(source, &edits);
        assert_eq!(
            outcome.text,
            "structuredClone(state.a).push(structuredClone(state.b).pop())"
        );
        assert_eq!(outcome.applied, 2);
    }

    #[test]
    fn test_overlapping_edit_is_skipped() {
        let source = "state.a[state.b.pop()].push(1)";
        let edits = [wrap(source, "state.a[state.b.pop()]"), wrap(source, "state.b")];
        let outcome = apply_edits(source, &edits);
        assert_eq!(
            outcome.text,
            "structuredClone(state.a[state.b.pop()]).push(1)"
        );
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_out_of_bounds_edit_is_skipped() {
        let source = "x.sort()";
        let edit = TextEdit::new(Span::new(4u32, 99u32), "nope");
        let outcome = apply_edits(source, &[edit]);
        assert_eq!(outcome.text, source);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_no_edits() {
        let outcome = apply_edits("unchanged", &[] as &[TextEdit]);
        assert_eq!(outcome.text, "unchanged");
        assert_eq!(outcome.applied, 0);
    }
}
