//! Source positions and text edits for store-lint-rs.
//!
//! Diagnostics carry byte [`Span`]s into the original document. [`LineIndex`] turns
//! them into line/column pairs for reporting, and [`apply_edits`] splices fix
//! replacements into the source without touching anything outside their spans.

mod edit;
mod line_index;
mod span;

pub use edit::{apply_edits, EditOutcome, TextEdit};
pub use line_index::{LineCol, LineIndex};
pub use span::{ByteOffset, Span};
