//! Decides whether a call site mutates store state.

use super::catalog::is_mutating;
use super::resolve::{resolve_root, RootClass};
use super::scope::ContextStack;
use smol_str::SmolStr;
use swc_common::{Span, Spanned};
use swc_ecma_ast::{CallExpr, Callee, Expr, MemberProp};

/// One offending call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The whole call, `state.items.sort(cmp)`.
    pub call: Span,
    /// The mutating method's name.
    pub method: SmolStr,
    /// The method name token, `sort`.
    pub method_span: Span,
    /// The object the method is called on, `state.items`.
    pub receiver: Span,
    /// The root of the receiver chain, `state`.
    pub root: Span,
    pub class: RootClass,
}

/// Checks one call expression against the active `getters` context.
///
/// Anything that does not have the exact `<chain>.<method>(...)` shape is not a
/// violation.
pub fn check(stack: &ContextStack, call: &CallExpr) -> Option<Violation> {
    let frame = stack.current()?;

    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Member(member) = &**callee else {
        return None;
    };
    let MemberProp::Ident(prop) = &member.prop else {
        return None;
    };
    if !is_mutating(&prop.sym) {
        return None;
    }

    let root = resolve_root(&member.obj);
    let class = frame.classify(root);
    if !class.is_store_state() {
        return None;
    }

    Some(Violation {
        call: call.span,
        method: SmolStr::new(&*prop.sym),
        method_span: prop.span,
        receiver: member.obj.span(),
        root: root.span(),
        class,
    })
}
