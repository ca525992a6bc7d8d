//! AST visitor wiring the context stack, detector and emitter together.

use super::scope::{first_param_name, param_names, ContextStack, FunctionKind};
use super::{detect, fix, NoArrayMutationsOptions};
use crate::parse::DocumentText;
use crate::Diagnostic;
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// Visitor for `no-array-mutations-on-state`.
pub struct MutationVisitor<'a> {
    /// Open `getters` blocks and the function scopes inside them.
    stack: ContextStack,
    /// Text of the document, for spans and fix text.
    doc: DocumentText<'a>,
    fix_enabled: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> MutationVisitor<'a> {
    pub fn new(doc: DocumentText<'a>, options: NoArrayMutationsOptions) -> Self {
        Self {
            stack: ContextStack::new(),
            doc,
            fix_enabled: options.enable_fix,
            diagnostics: Vec::new(),
        }
    }

    /// Returns the collected diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Binds the state parameter of every accessor defined directly in the
    /// `getters` object literal.
    fn register_accessors(&mut self, object: &ObjectLit) {
        for prop in &object.props {
            let PropOrSpread::Prop(prop) = prop else {
                continue;
            };
            match &**prop {
                Prop::KeyValue(kv) => match unparen(&kv.value) {
                    Expr::Arrow(arrow) => self
                        .stack
                        .bind_param(arrow.span.into(), first_param_name(arrow.params.first())),
                    Expr::Fn(fn_expr) => self.bind_function(&fn_expr.function),
                    _ => {}
                },
                Prop::Method(method) => self.bind_function(&method.function),
                Prop::Getter(getter) => self.stack.bind_param(getter.span.into(), None),
                _ => {}
            }
        }
    }

    fn bind_function(&mut self, function: &Function) {
        let first = function.params.first().map(|param| &param.pat);
        self.stack
            .bind_param(function.span.into(), first_param_name(first));
    }
}

/// Strips parentheses and TypeScript wrappers (`as`, `satisfies`, `as const`,
/// `<T>expr`, `expr!`) around an accessor value.
fn unparen(expr: &Expr) -> &Expr {
    let mut current = expr;
    loop {
        current = match current {
            Expr::Paren(inner) => &inner.expr,
            Expr::TsAs(inner) => &inner.expr,
            Expr::TsSatisfies(inner) => &inner.expr,
            Expr::TsConstAssertion(inner) => &inner.expr,
            Expr::TsTypeAssertion(inner) => &inner.expr,
            Expr::TsNonNull(inner) => &inner.expr,
            _ => return current,
        };
    }
}

impl Visit for MutationVisitor<'_> {
    fn visit_key_value_prop(&mut self, prop: &KeyValueProp) {
        if self.stack.enter(prop) {
            if let Expr::Object(object) = &*prop.value {
                self.register_accessors(object);
            }
        }
        prop.visit_children_with(self);
        self.stack.exit(prop);
    }

    fn visit_arrow_expr(&mut self, arrow: &ArrowExpr) {
        let tracked = self.stack.enter_function(
            arrow.span.into(),
            FunctionKind::Arrow,
            param_names(&arrow.params),
        );
        arrow.visit_children_with(self);
        if tracked {
            self.stack.leave_function();
        }
    }

    fn visit_function(&mut self, function: &Function) {
        let tracked = self.stack.enter_function(
            function.span.into(),
            FunctionKind::Regular,
            param_names(function.params.iter().map(|param| &param.pat)),
        );
        function.visit_children_with(self);
        if tracked {
            self.stack.leave_function();
        }
    }

    fn visit_getter_prop(&mut self, getter: &GetterProp) {
        let tracked =
            self.stack
                .enter_function(getter.span.into(), FunctionKind::Regular, Vec::new());
        getter.visit_children_with(self);
        if tracked {
            self.stack.leave_function();
        }
    }

    fn visit_setter_prop(&mut self, setter: &SetterProp) {
        let tracked = self.stack.enter_function(
            setter.span.into(),
            FunctionKind::Regular,
            param_names([&*setter.param]),
        );
        setter.visit_children_with(self);
        if tracked {
            self.stack.leave_function();
        }
    }

    fn visit_constructor(&mut self, ctor: &Constructor) {
        let params = ctor.params.iter().filter_map(|param| match param {
            ParamOrTsParamProp::Param(param) => Some(&param.pat),
            ParamOrTsParamProp::TsParamProp(_) => None,
        });
        let tracked = self.stack.enter_function(
            ctor.span.into(),
            FunctionKind::Regular,
            param_names(params),
        );
        ctor.visit_children_with(self);
        if tracked {
            self.stack.leave_function();
        }
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Some(violation) = detect::check(&self.stack, call) {
            tracing::debug!(
                method = %violation.method,
                class = ?violation.class,
                root = ?violation.root,
                call = ?violation.call,
                "in-place array mutation on store state"
            );
            self.diagnostics
                .push(fix::emit(&violation, self.fix_enabled, &self.doc));
        }
        call.visit_children_with(self);
    }
}
