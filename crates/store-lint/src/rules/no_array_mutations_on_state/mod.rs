//! `no-array-mutations-on-state`: in-place array mutations inside store getters.
//!
//! Getters are read-only derivations of store state. Calling `sort`, `push` and
//! the other in-place array methods on state from inside a getter silently
//! rewrites the store on every read:
//!
//! ```js
//! defineStore('todos', {
//!   getters: {
//!     sorted: state => state.items.sort(),     // flagged
//!     newest: () => this.items.reverse(),      // flagged
//!     safe: state => [...state.items].sort(),  // fine, sorts a copy
//!   },
//! })
//! ```
//!
//! A call is reported when all of these hold:
//! 1. it sits inside the object literal of a `getters` property,
//! 2. the method is in [`MUTATING_ARRAY_METHODS`],
//! 3. the receiver chain (`a.b.c` in `a.b.c.sort()`) is rooted at the state
//!    parameter of the enclosing getter, or at `this`.
//!
//! With `enableFix` the receiver is wrapped in `structuredClone(...)`.

mod catalog;
mod detect;
mod fix;
mod resolve;
mod scope;
mod visitor;

use super::{RuleKind, RuleMeta};
use crate::parse::DocumentText;
use crate::Diagnostic;
use serde::Deserialize;
use swc_ecma_ast::Module;
use swc_ecma_visit::VisitWith;

pub use catalog::{is_mutating, MUTATING_ARRAY_METHODS};
pub use detect::{check as check_call, Violation};
pub use fix::{emit, DEEP_COPY_FN};
pub use resolve::{resolve_root, RootClass};
pub use scope::{ContextFrame, ContextStack, FunctionId, FunctionKind, ACCESSOR_GROUP_KEY};
pub use visitor::MutationVisitor;

/// Rule name, as used in configuration files and diagnostic codes.
pub const NAME: &str = "no-array-mutations-on-state";

pub const META: RuleMeta = RuleMeta {
    name: NAME,
    kind: RuleKind::Problem,
    description: "Disallow array mutations in pinia getters that modify the reactive state of the store itself.",
    category: "Possible Errors",
    recommended: false,
    fixable: true,
};

/// Options accepted by the rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NoArrayMutationsOptions {
    /// Produce `structuredClone(...)` fixes. Off unless set explicitly.
    #[serde(default)]
    pub enable_fix: bool,
}

/// Runs the rule over a parsed module.
pub fn check(
    module: &Module,
    doc: &DocumentText<'_>,
    options: NoArrayMutationsOptions,
) -> Vec<Diagnostic> {
    let mut visitor = MutationVisitor::new(*doc, options);
    module.visit_with(&mut visitor);
    visitor.into_diagnostics()
}
