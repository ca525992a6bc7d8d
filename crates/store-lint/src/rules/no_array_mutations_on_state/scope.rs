//! Context tracking for `getters` blocks.
//!
//! Each `getters: { ... }` literal gets a [`ContextFrame`]. The frame knows which
//! function literals are the accessors of that block and which parameter each of
//! them binds to the store state. While the traversal descends it keeps a chain
//! of the function scopes it is inside, so a receiver root is always classified
//! against its nearest enclosing accessor, whatever order siblings are visited in.

use super::resolve::RootClass;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use swc_common::{BytePos, Span};
use swc_ecma_ast::{Expr, KeyValueProp, ObjectPatProp, Pat, PropName};

/// Property key of the object literal holding a store's getters.
pub const ACCESSOR_GROUP_KEY: &str = "getters";

/// Identity of a function node within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId {
    lo: BytePos,
    hi: BytePos,
}

impl From<Span> for FunctionId {
    fn from(span: Span) -> Self {
        Self {
            lo: span.lo,
            hi: span.hi,
        }
    }
}

/// Whether a function has its own `this`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Arrow functions inherit `this` from the enclosing scope.
    Arrow,
    /// Function expressions, methods and accessors bind their own `this`.
    Regular,
}

#[derive(Debug)]
struct FunctionScope {
    id: FunctionId,
    kind: FunctionKind,
    params: Vec<SmolStr>,
}

/// One `getters` literal being traversed.
#[derive(Debug, Default)]
pub struct ContextFrame {
    /// Accessor functions of this block and the state parameter each binds.
    accessors: FxHashMap<FunctionId, Option<SmolStr>>,
    /// Functions entered since the frame was pushed, innermost last.
    scopes: Vec<FunctionScope>,
}

impl ContextFrame {
    /// Records `param` as the state parameter of accessor `id`.
    ///
    /// `None` marks an accessor without a usable first parameter: only `this`
    /// can refer to the store inside it.
    pub fn bind_param(&mut self, id: FunctionId, param: Option<SmolStr>) {
        self.accessors.insert(id, param);
    }

    /// The state parameter of the accessor enclosing the current position.
    #[cfg(test)]
    pub fn bound_param(&self) -> Option<&str> {
        let scope = self
            .scopes
            .iter()
            .rev()
            .find(|scope| self.accessors.contains_key(&scope.id))?;
        self.accessors.get(&scope.id)?.as_deref()
    }

    /// Classifies the root of a receiver chain at the current position.
    pub fn classify(&self, root: &Expr) -> RootClass {
        match root {
            Expr::This(_) => self.classify_this(),
            Expr::Ident(ident) => self.classify_ident(&ident.sym),
            _ => RootClass::Other,
        }
    }

    fn classify_this(&self) -> RootClass {
        for scope in self.scopes.iter().rev() {
            if self.accessors.contains_key(&scope.id) {
                return RootClass::ImplicitReceiver;
            }
            if scope.kind == FunctionKind::Regular {
                // A nested `function` rebinds `this`.
                return RootClass::Other;
            }
        }
        // Directly inside the literal, outside any accessor.
        RootClass::ImplicitReceiver
    }

    fn classify_ident(&self, name: &str) -> RootClass {
        for scope in self.scopes.iter().rev() {
            if let Some(bound) = self.accessors.get(&scope.id) {
                return if bound.as_deref() == Some(name) {
                    RootClass::BoundParameter
                } else {
                    RootClass::Other
                };
            }
            if scope.params.iter().any(|param| param == name) {
                // Shadowed by a callback parameter.
                return RootClass::Other;
            }
        }
        RootClass::Other
    }
}

/// Stack of `getters` frames for one traversal.
#[derive(Debug, Default)]
pub struct ContextStack {
    frames: Vec<ContextFrame>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a frame if `prop` is a `getters: { ... }` property.
    pub fn enter(&mut self, prop: &KeyValueProp) -> bool {
        if !is_accessor_group(prop) {
            return false;
        }
        self.frames.push(ContextFrame::default());
        tracing::trace!(depth = self.frames.len(), "entered getters block");
        true
    }

    /// Pops the frame pushed by the matching [`enter`](Self::enter).
    ///
    /// # Panics
    ///
    /// Panics if no frame is open, which means the traversal did not pair its
    /// enter and exit calls.
    pub fn exit(&mut self, prop: &KeyValueProp) {
        if !is_accessor_group(prop) {
            return;
        }
        if self.frames.pop().is_none() {
            panic!("left a `{ACCESSOR_GROUP_KEY}` block that was never entered");
        }
        tracing::trace!(depth = self.frames.len(), "left getters block");
    }

    /// Binds the state parameter of an accessor in the active frame.
    pub fn bind_param(&mut self, id: FunctionId, param: Option<SmolStr>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.bind_param(id, param);
        }
    }

    /// Opens a function scope in the active frame.
    ///
    /// Returns false, and tracks nothing, outside of any `getters` block.
    pub fn enter_function(
        &mut self,
        id: FunctionId,
        kind: FunctionKind,
        params: Vec<SmolStr>,
    ) -> bool {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.scopes.push(FunctionScope { id, kind, params });
                true
            }
            None => false,
        }
    }

    /// Closes the innermost function scope opened by
    /// [`enter_function`](Self::enter_function).
    ///
    /// # Panics
    ///
    /// Panics if there is no open function scope.
    pub fn leave_function(&mut self) {
        let popped = self
            .frames
            .last_mut()
            .and_then(|frame| frame.scopes.pop());
        if popped.is_none() {
            panic!("left a function scope that was never entered");
        }
    }

    /// The active frame, if the traversal is inside a `getters` block.
    pub fn current(&self) -> Option<&ContextFrame> {
        self.frames.last()
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Returns true for `getters: { ... }` (identifier or string key).
pub fn is_accessor_group(prop: &KeyValueProp) -> bool {
    prop_name_str(&prop.key) == Some(ACCESSOR_GROUP_KEY) && matches!(&*prop.value, Expr::Object(_))
}

fn prop_name_str(key: &PropName) -> Option<&str> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.as_str()),
        PropName::Str(s) => s.value.as_str(),
        _ => None,
    }
}

/// Name bound by a first parameter: `state` or `state = {}`.
///
/// Destructured parameters bind no single name for the state.
pub fn first_param_name(pat: Option<&Pat>) -> Option<SmolStr> {
    match pat? {
        Pat::Ident(binding) => Some(SmolStr::new(&*binding.id.sym)),
        Pat::Assign(assign) => first_param_name(Some(&*assign.left)),
        _ => None,
    }
}

/// Every name a parameter list binds, including destructured ones.
pub fn param_names<'p>(params: impl IntoIterator<Item = &'p Pat>) -> Vec<SmolStr> {
    let mut names = Vec::new();
    for pat in params {
        collect_pat_names(pat, &mut names);
    }
    names
}

fn collect_pat_names(pat: &Pat, names: &mut Vec<SmolStr>) {
    match pat {
        Pat::Ident(binding) => names.push(SmolStr::new(&*binding.id.sym)),
        Pat::Assign(assign) => collect_pat_names(&assign.left, names),
        Pat::Rest(rest) => collect_pat_names(&rest.arg, names),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_pat_names(elem, names);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_pat_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => {
                        names.push(SmolStr::new(&*assign.key.id.sym));
                    }
                    ObjectPatProp::Rest(rest) => collect_pat_names(&rest.arg, names),
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_document, SourceKind};
    use swc_common::DUMMY_SP;
    use swc_ecma_ast::{Ident, ModuleItem, Prop, PropOrSpread, Stmt, ThisExpr};

    fn id(lo: u32, hi: u32) -> FunctionId {
        FunctionId::from(Span::new(BytePos(lo), BytePos(hi)))
    }

    fn this() -> Expr {
        Expr::This(ThisExpr { span: DUMMY_SP })
    }

    fn ident(name: &str) -> Expr {
        Expr::Ident(Ident::new_no_ctxt(name.into(), DUMMY_SP))
    }

    /// Parses `({ key: value })` and hands the single key-value property to `f`.
    fn with_prop(object: &str, f: impl FnOnce(&KeyValueProp)) {
        let parsed = parse_document(&format!("({object})"), SourceKind::Js).unwrap();
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &parsed.module.body[0] else {
            panic!("expected an expression statement");
        };
        let Expr::Paren(paren) = &*stmt.expr else {
            panic!("expected a parenthesized object");
        };
        let Expr::Object(obj) = &*paren.expr else {
            panic!("expected an object literal");
        };
        let PropOrSpread::Prop(prop) = &obj.props[0] else {
            panic!("expected a property");
        };
        let Prop::KeyValue(kv) = &**prop else {
            panic!("expected a key-value property");
        };
        f(kv);
    }

    #[test]
    fn test_accessor_group_detection() {
        with_prop("{ getters: {} }", |kv| assert!(is_accessor_group(kv)));
        with_prop("{ 'getters': {} }", |kv| assert!(is_accessor_group(kv)));
        with_prop("{ getters: makeGetters() }", |kv| assert!(!is_accessor_group(kv)));
        with_prop("{ actions: {} }", |kv| assert!(!is_accessor_group(kv)));
    }

    #[test]
    fn test_enter_exit_pairs() {
        let mut stack = ContextStack::new();
        with_prop("{ getters: {} }", |kv| {
            assert!(stack.enter(kv));
            assert!(stack.enter(kv));
            assert_eq!(stack.depth(), 2);
            stack.exit(kv);
            stack.exit(kv);
        });
        assert!(stack.current().is_none());

        with_prop("{ state: {} }", |kv| {
            assert!(!stack.enter(kv));
            stack.exit(kv);
        });
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    #[should_panic(expected = "never entered")]
    fn test_exit_without_enter_panics() {
        let mut stack = ContextStack::new();
        with_prop("{ getters: {} }", |kv| stack.exit(kv));
    }

    #[test]
    fn test_functions_outside_frames_are_untracked() {
        let mut stack = ContextStack::new();
        assert!(!stack.enter_function(id(1, 5), FunctionKind::Arrow, Vec::new()));
    }

    #[test]
    fn test_bound_parameter() {
        let mut frame = ContextFrame::default();
        frame.bind_param(id(1, 30), Some("state".into()));
        frame.scopes.push(FunctionScope {
            id: id(1, 30),
            kind: FunctionKind::Arrow,
            params: vec!["state".into()],
        });

        assert_eq!(frame.bound_param(), Some("state"));
        assert_eq!(frame.classify(&ident("state")), RootClass::BoundParameter);
        assert_eq!(frame.classify(&ident("other")), RootClass::Other);
        assert_eq!(frame.classify(&this()), RootClass::ImplicitReceiver);
    }

    #[test]
    fn test_zero_param_accessor_only_matches_this() {
        let mut frame = ContextFrame::default();
        frame.bind_param(id(1, 30), None);
        frame.scopes.push(FunctionScope {
            id: id(1, 30),
            kind: FunctionKind::Arrow,
            params: Vec::new(),
        });

        assert_eq!(frame.bound_param(), None);
        assert_eq!(frame.classify(&ident("state")), RootClass::Other);
        assert_eq!(frame.classify(&this()), RootClass::ImplicitReceiver);
    }

    #[test]
    fn test_sibling_bindings_do_not_leak() {
        let mut frame = ContextFrame::default();
        frame.bind_param(id(1, 30), Some("state".into()));
        frame.bind_param(id(40, 70), Some("s".into()));

        // Inside the first accessor, after the second one was registered.
        frame.scopes.push(FunctionScope {
            id: id(1, 30),
            kind: FunctionKind::Arrow,
            params: vec!["state".into()],
        });
        assert_eq!(frame.classify(&ident("state")), RootClass::BoundParameter);
        assert_eq!(frame.classify(&ident("s")), RootClass::Other);
    }

    #[test]
    fn test_nested_callbacks() {
        let mut frame = ContextFrame::default();
        frame.bind_param(id(1, 90), Some("state".into()));
        frame.scopes.push(FunctionScope {
            id: id(1, 90),
            kind: FunctionKind::Regular,
            params: vec!["state".into()],
        });
        frame.scopes.push(FunctionScope {
            id: id(20, 60),
            kind: FunctionKind::Arrow,
            params: vec!["item".into()],
        });

        // Arrow callbacks see the accessor's state and `this`.
        assert_eq!(frame.classify(&ident("state")), RootClass::BoundParameter);
        assert_eq!(frame.classify(&ident("item")), RootClass::Other);
        assert_eq!(frame.classify(&this()), RootClass::ImplicitReceiver);

        // A regular function callback shadows `state` and rebinds `this`.
        frame.scopes.push(FunctionScope {
            id: id(30, 50),
            kind: FunctionKind::Regular,
            params: vec!["state".into()],
        });
        assert_eq!(frame.classify(&ident("state")), RootClass::Other);
        assert_eq!(frame.classify(&this()), RootClass::Other);
        assert_eq!(frame.bound_param(), Some("state"));
    }

    #[test]
    fn test_param_names() {
        let parsed =
            parse_document("function f(a, { b, c: [d, ...e] }, f = 1, ...g) {}", SourceKind::Js)
                .unwrap();
        let ModuleItem::Stmt(Stmt::Decl(swc_ecma_ast::Decl::Fn(decl))) = &parsed.module.body[0]
        else {
            panic!("expected a function declaration");
        };
        let pats: Vec<&Pat> = decl.function.params.iter().map(|p| &p.pat).collect();

        let names = param_names(pats.iter().copied());
        assert_eq!(names, ["a", "b", "d", "e", "f", "g"]);
        assert_eq!(first_param_name(pats.first().copied()).as_deref(), Some("a"));
        assert_eq!(first_param_name(pats.get(1).copied()), None);
        assert_eq!(first_param_name(pats.get(2).copied()).as_deref(), Some("f"));
        assert_eq!(first_param_name(None), None);
    }
}
