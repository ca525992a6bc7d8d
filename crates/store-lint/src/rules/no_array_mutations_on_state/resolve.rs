//! Root resolution for property-access chains.

use swc_ecma_ast::Expr;

/// What the root of a receiver chain refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootClass {
    /// The accessor's state parameter, e.g. `state` in `state => state.a.sort()`.
    BoundParameter,
    /// `this`, where it still denotes the store.
    ImplicitReceiver,
    /// Anything else: other identifiers, calls, literals, spreads, parentheses.
    Other,
}

impl RootClass {
    /// Returns true if mutating through this root mutates store state.
    pub fn is_store_state(self) -> bool {
        matches!(self, RootClass::BoundParameter | RootClass::ImplicitReceiver)
    }
}

/// Strips member accesses off `expr` until something that is not a member
/// access is left: `a.b[c].#d` resolves to `a`.
///
/// Calls, parentheses, optional chains and `super.x` stop the walk, so
/// `structuredClone(state.a)` and `[...state.a]` never resolve to `state`.
pub fn resolve_root(expr: &Expr) -> &Expr {
    let mut current = expr;
    while let Expr::Member(member) = current {
        current = &member.obj;
    }
    current
}
