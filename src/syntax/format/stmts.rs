use crate::ast::*;
use crate::span::Spanned;

use super::FormatCtx;

impl FormatCtx {
    /// Emit one statement starting at the current position; the caller has
    /// already written the indentation.
    pub(super) fn emit_stmt(&mut self, stmt: &Spanned<Stmt>, indent: &str) {
        match &stmt.node {
            Stmt::Var(decls) => {
                self.output.push_str("var ");
                self.emit_declarators(decls, indent, false);
                self.output.push(';');
            }
            Stmt::Function(func) => self.emit_function(func, indent),
            Stmt::Block(block) => self.emit_block(&block.stmts, stmt.span, indent),
            Stmt::Empty => self.output.push(';'),
            Stmt::Expr(expr) => {
                // `function` or `{` at statement start would parse as a
                // declaration or block.
                let wrap = matches!(
                    expr.node.leftmost(),
                    Expr::Function(_) | Expr::Object(_)
                );
                if wrap {
                    self.output.push('(');
                }
                self.emit_expr(expr, Precedence::Sequence, indent);
                if wrap {
                    self.output.push(')');
                }
                self.output.push(';');
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => self.emit_if(test, consequent, alternate.as_deref(), indent),
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                self.output.push_str("for (");
                match init {
                    Some(ForInit::Var(decls)) => {
                        self.output.push_str("var ");
                        self.emit_declarators(decls, indent, true);
                    }
                    Some(ForInit::Expr(expr)) => self.emit_no_in(expr, Precedence::Sequence, indent),
                    None => {}
                }
                self.output.push(';');
                if let Some(test) = test {
                    self.output.push(' ');
                    self.emit_expr(test, Precedence::Sequence, indent);
                }
                self.output.push(';');
                if let Some(update) = update {
                    self.output.push(' ');
                    self.emit_expr(update, Precedence::Sequence, indent);
                }
                self.output.push(')');
                self.emit_body(body, indent);
            }
            Stmt::ForIn { left, right, body } => {
                self.output.push_str("for (");
                match left {
                    ForInTarget::Var(decl) => {
                        self.output.push_str("var ");
                        self.emit_declarators(std::slice::from_ref(decl), indent, true);
                    }
                    ForInTarget::Expr(expr) => self.emit_expr(expr, Precedence::Call, indent),
                }
                self.output.push_str(" in ");
                self.emit_expr(right, Precedence::Sequence, indent);
                self.output.push(')');
                self.emit_body(body, indent);
            }
            Stmt::While { test, body } => {
                self.output.push_str("while (");
                self.emit_expr(test, Precedence::Sequence, indent);
                self.output.push(')');
                self.emit_body(body, indent);
            }
            Stmt::DoWhile { body, test } => {
                self.output.push_str("do");
                self.emit_body(body, indent);
                if matches!(body.node, Stmt::Block(_)) {
                    self.output.push(' ');
                } else {
                    self.newline();
                    self.output.push_str(indent);
                }
                self.output.push_str("while (");
                self.emit_expr(test, Precedence::Sequence, indent);
                self.output.push_str(");");
            }
            Stmt::Return(arg) => self.emit_keyword_expr("return", arg.as_ref(), indent),
            Stmt::Throw(arg) => self.emit_keyword_expr("throw", Some(arg), indent),
            Stmt::Break(label) => self.emit_jump("break", label.as_ref()),
            Stmt::Continue(label) => self.emit_jump("continue", label.as_ref()),
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => {
                self.output.push_str("try ");
                self.emit_block(&block.node.stmts, block.span, indent);
                if let Some(handler) = handler {
                    self.output.push_str(" catch (");
                    self.output.push_str(&handler.param.node);
                    self.output.push_str(") ");
                    self.emit_block(&handler.body.node.stmts, handler.body.span, indent);
                }
                if let Some(finalizer) = finalizer {
                    self.output.push_str(" finally ");
                    self.emit_block(&finalizer.node.stmts, finalizer.span, indent);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
            } => self.emit_switch(stmt, discriminant, cases, indent),
            Stmt::Labeled { label, body } => {
                self.output.push_str(&label.node);
                self.output.push(':');
                self.emit_body(body, indent);
            }
            Stmt::Debugger => self.output.push_str("debugger;"),
        }
    }

    /// Body of `if`/`for`/`while`/labels: a block stays on the same line,
    /// anything else moves to the next line one level deeper.
    fn emit_body(&mut self, body: &Spanned<Stmt>, indent: &str) {
        match &body.node {
            Stmt::Block(block) => {
                self.output.push(' ');
                self.emit_block(&block.stmts, body.span, indent);
            }
            Stmt::Empty => self.output.push(';'),
            _ => {
                let inner = self.nested(indent);
                self.newline();
                self.output.push_str(&inner);
                self.emit_stmt(body, &inner);
            }
        }
    }

    fn emit_if(
        &mut self,
        test: &Spanned<Expr>,
        consequent: &Spanned<Stmt>,
        alternate: Option<&Spanned<Stmt>>,
        indent: &str,
    ) {
        self.output.push_str("if (");
        self.emit_expr(test, Precedence::Sequence, indent);
        self.output.push(')');
        self.emit_body(consequent, indent);

        let Some(alternate) = alternate else {
            return;
        };
        if matches!(consequent.node, Stmt::Block(_)) {
            self.output.push_str(" else");
        } else {
            self.newline();
            self.output.push_str(indent);
            self.output.push_str("else");
        }
        if matches!(alternate.node, Stmt::If { .. }) {
            self.output.push(' ');
            self.emit_stmt(alternate, indent);
        } else {
            self.emit_body(alternate, indent);
        }
    }

    fn emit_switch(
        &mut self,
        stmt: &Spanned<Stmt>,
        discriminant: &Spanned<Expr>,
        cases: &[Spanned<SwitchCase>],
        indent: &str,
    ) {
        let case_indent = self.nested(indent);
        let body_indent = self.nested(&case_indent);
        self.output.push_str("switch (");
        self.emit_expr(discriminant, Precedence::Sequence, indent);
        self.output.push_str(") {");

        for case in cases {
            self.newline();
            self.emit_leading_comments(case.span, stmt.span, &case_indent);
            self.output.push_str(&case_indent);
            match &case.node.test {
                Some(test) => {
                    self.output.push_str("case ");
                    self.emit_expr(test, Precedence::Sequence, &case_indent);
                    self.output.push(':');
                }
                None => self.output.push_str("default:"),
            }

            if let [only] = case.node.body.as_slice() {
                if let Stmt::Block(block) = &only.node {
                    self.output.push(' ');
                    self.emit_block(&block.stmts, only.span, &case_indent);
                    continue;
                }
            }
            for inner in &case.node.body {
                self.newline();
                self.emit_leading_comments(inner.span, stmt.span, &body_indent);
                self.output.push_str(&body_indent);
                self.emit_stmt(inner, &body_indent);
                self.emit_trailing_comment(inner.span);
            }
        }
        self.emit_closing_comments(stmt.span, &case_indent);
        self.newline();
        self.output.push_str(indent);
        self.output.push('}');
    }

    fn emit_declarators(&mut self, decls: &[VarDeclarator], indent: &str, no_in: bool) {
        for (i, decl) in decls.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.output.push_str(&decl.name.node);
            if let Some(init) = &decl.init {
                self.output.push_str(" = ");
                if no_in {
                    self.emit_no_in(init, Precedence::Assignment, indent);
                } else {
                    self.emit_expr(init, Precedence::Assignment, indent);
                }
            }
        }
    }

    fn emit_keyword_expr(&mut self, keyword: &str, arg: Option<&Spanned<Expr>>, indent: &str) {
        self.output.push_str(keyword);
        if let Some(arg) = arg {
            self.output.push(' ');
            self.emit_expr(arg, Precedence::Sequence, indent);
        }
        self.output.push(';');
    }

    fn emit_jump(&mut self, keyword: &str, label: Option<&Spanned<String>>) {
        self.output.push_str(keyword);
        if let Some(label) = label {
            self.output.push(' ');
            self.output.push_str(&label.node);
        }
        self.output.push(';');
    }

    pub(super) fn emit_function(&mut self, func: &Function, indent: &str) {
        self.output.push_str("function ");
        if let Some(id) = &func.id {
            self.output.push_str(&id.node);
        }
        self.emit_params(&func.params);
        self.output.push(' ');
        self.emit_block(&func.body.node.stmts, func.body.span, indent);
    }

    pub(super) fn emit_params(&mut self, params: &[Spanned<String>]) {
        self.output.push('(');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.output.push_str(&param.node);
        }
        self.output.push(')');
    }
}
