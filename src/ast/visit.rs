//! Tree traversal.
//!
//! [`Visit`] is a read-only walk used by analyses and the printer.
//! [`rewrite_program`] is the mutable walk the conversion passes run on:
//! it offers every expression to a visitor in either enter (pre) or leave
//! (post) order and splices in replacements.

use super::*;

/// Read-only visitor. Override a hook and call the matching `walk_*`
/// function to keep descending.
pub trait Visit {
    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_block(&mut self, block: &Spanned<Block>) {
        walk_block(self, block);
    }

    fn visit_function(&mut self, func: &Function) {
        walk_function(self, func);
    }

    fn visit_catch(&mut self, clause: &CatchClause) {
        self.visit_block(&clause.body);
    }

    fn visit_declarator(&mut self, decl: &VarDeclarator) {
        if let Some(init) = &decl.init {
            self.visit_expr(init);
        }
    }
}

pub fn walk_program<V: Visit + ?Sized>(v: &mut V, program: &Program) {
    for stmt in &program.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_block<V: Visit + ?Sized>(v: &mut V, block: &Spanned<Block>) {
    for stmt in &block.node.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_function<V: Visit + ?Sized>(v: &mut V, func: &Function) {
    v.visit_block(&func.body);
}

pub fn walk_stmt<V: Visit + ?Sized>(v: &mut V, stmt: &Spanned<Stmt>) {
    match &stmt.node {
        Stmt::Var(decls) => {
            for decl in decls {
                v.visit_declarator(decl);
            }
        }
        Stmt::Function(func) => v.visit_function(func),
        Stmt::Block(block) => {
            for inner in &block.stmts {
                v.visit_stmt(inner);
            }
        }
        Stmt::Empty | Stmt::Debugger | Stmt::Break(_) | Stmt::Continue(_) => {}
        Stmt::Expr(expr) | Stmt::Throw(expr) => v.visit_expr(expr),
        Stmt::If {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_stmt(consequent);
            if let Some(alt) = alternate {
                v.visit_stmt(alt);
            }
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Var(decls)) => {
                    for decl in decls {
                        v.visit_declarator(decl);
                    }
                }
                Some(ForInit::Expr(expr)) => v.visit_expr(expr),
                None => {}
            }
            if let Some(test) = test {
                v.visit_expr(test);
            }
            if let Some(update) = update {
                v.visit_expr(update);
            }
            v.visit_stmt(body);
        }
        Stmt::ForIn { left, right, body } => {
            match left {
                ForInTarget::Var(decl) => v.visit_declarator(decl),
                ForInTarget::Expr(expr) => v.visit_expr(expr),
            }
            v.visit_expr(right);
            v.visit_stmt(body);
        }
        Stmt::While { test, body } | Stmt::DoWhile { body, test } => {
            v.visit_expr(test);
            v.visit_stmt(body);
        }
        Stmt::Return(arg) => {
            if let Some(arg) = arg {
                v.visit_expr(arg);
            }
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
        } => {
            v.visit_block(block);
            if let Some(handler) = handler {
                v.visit_catch(handler);
            }
            if let Some(finalizer) = finalizer {
                v.visit_block(finalizer);
            }
        }
        Stmt::Switch {
            discriminant,
            cases,
        } => {
            v.visit_expr(discriminant);
            for case in cases {
                if let Some(test) = &case.node.test {
                    v.visit_expr(test);
                }
                for inner in &case.node.body {
                    v.visit_stmt(inner);
                }
            }
        }
        Stmt::Labeled { body, .. } => v.visit_stmt(body),
    }
}

pub fn walk_expr<V: Visit + ?Sized>(v: &mut V, expr: &Spanned<Expr>) {
    match &expr.node {
        Expr::Ident(_) | Expr::This | Expr::Literal(_) => {}
        Expr::Array(items) => {
            for item in items.iter().flatten() {
                v.visit_expr(item);
            }
        }
        Expr::Object(props) => {
            for prop in props {
                v.visit_expr(&prop.value);
            }
        }
        Expr::Function(func) => v.visit_function(func),
        Expr::Member { object, property } => {
            v.visit_expr(object);
            if let MemberProp::Computed(prop) = property {
                v.visit_expr(prop);
            }
        }
        Expr::Call { callee, args } | Expr::New { callee, args } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Update { arg, .. } | Expr::Unary { arg, .. } => v.visit_expr(arg),
        Expr::Binary { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_expr(consequent);
            v.visit_expr(alternate);
        }
        Expr::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Expr::Sequence(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
    }
}

// --- Rewriting walk ---

/// When the visitor runs relative to a node's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Before the children. A replacement is walked into in the same pass.
    Enter,
    /// After the children. A replacement is not walked again.
    Leave,
}

/// Outcome of visiting one expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Rewrite {
    Unchanged,
    Replace(Spanned<Expr>),
}

/// Move an expression out of its slot, leaving a placeholder that the
/// caller is expected to overwrite.
pub fn take_expr(slot: &mut Spanned<Expr>) -> Spanned<Expr> {
    std::mem::replace(slot, Spanned::dummy(Expr::This))
}

/// Walk every expression of `program` once, in the given order, replacing
/// expressions for which `visit` returns [`Rewrite::Replace`].
pub fn rewrite_program<F>(program: &mut Program, order: Order, visit: &mut F)
where
    F: FnMut(&mut Spanned<Expr>) -> Rewrite,
{
    let mut walker = RewriteWalk { order, visit };
    for stmt in &mut program.body {
        walker.stmt(stmt);
    }
}

struct RewriteWalk<'f, F> {
    order: Order,
    visit: &'f mut F,
}

impl<F> RewriteWalk<'_, F>
where
    F: FnMut(&mut Spanned<Expr>) -> Rewrite,
{
    fn expr(&mut self, expr: &mut Spanned<Expr>) {
        match self.order {
            Order::Enter => {
                if let Rewrite::Replace(new) = (self.visit)(expr) {
                    *expr = new;
                }
                self.expr_children(expr);
            }
            Order::Leave => {
                self.expr_children(expr);
                if let Rewrite::Replace(new) = (self.visit)(expr) {
                    *expr = new;
                }
            }
        }
    }

    fn function(&mut self, func: &mut Function) {
        self.stmts(&mut func.body.node.stmts);
    }

    fn stmts(&mut self, stmts: &mut [Spanned<Stmt>]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn declarator(&mut self, decl: &mut VarDeclarator) {
        if let Some(init) = &mut decl.init {
            self.expr(init);
        }
    }

    fn stmt(&mut self, stmt: &mut Spanned<Stmt>) {
        match &mut stmt.node {
            Stmt::Var(decls) => {
                for decl in decls {
                    self.declarator(decl);
                }
            }
            Stmt::Function(func) => self.function(func),
            Stmt::Block(block) => self.stmts(&mut block.stmts),
            Stmt::Empty | Stmt::Debugger | Stmt::Break(_) | Stmt::Continue(_) => {}
            Stmt::Expr(expr) | Stmt::Throw(expr) => self.expr(expr),
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test);
                self.stmt(consequent);
                if let Some(alt) = alternate {
                    self.stmt(alt);
                }
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                match init {
                    Some(ForInit::Var(decls)) => {
                        for decl in decls {
                            self.declarator(decl);
                        }
                    }
                    Some(ForInit::Expr(expr)) => self.expr(expr),
                    None => {}
                }
                if let Some(test) = test {
                    self.expr(test);
                }
                if let Some(update) = update {
                    self.expr(update);
                }
                self.stmt(body);
            }
            Stmt::ForIn { left, right, body } => {
                match left {
                    ForInTarget::Var(decl) => self.declarator(decl),
                    ForInTarget::Expr(expr) => self.expr(expr),
                }
                self.expr(right);
                self.stmt(body);
            }
            Stmt::While { test, body } => {
                self.expr(test);
                self.stmt(body);
            }
            Stmt::DoWhile { body, test } => {
                self.stmt(body);
                self.expr(test);
            }
            Stmt::Return(arg) => {
                if let Some(arg) = arg {
                    self.expr(arg);
                }
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => {
                self.stmts(&mut block.node.stmts);
                if let Some(handler) = handler {
                    self.stmts(&mut handler.body.node.stmts);
                }
                if let Some(finalizer) = finalizer {
                    self.stmts(&mut finalizer.node.stmts);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
            } => {
                self.expr(discriminant);
                for case in cases {
                    if let Some(test) = &mut case.node.test {
                        self.expr(test);
                    }
                    self.stmts(&mut case.node.body);
                }
            }
            Stmt::Labeled { body, .. } => self.stmt(body),
        }
    }

    fn expr_children(&mut self, expr: &mut Spanned<Expr>) {
        match &mut expr.node {
            Expr::Ident(_) | Expr::This | Expr::Literal(_) => {}
            Expr::Array(items) => {
                for item in items.iter_mut().flatten() {
                    self.expr(item);
                }
            }
            Expr::Object(props) => {
                for prop in props {
                    self.expr(&mut prop.value);
                }
            }
            Expr::Function(func) => self.function(func),
            Expr::Member { object, property } => {
                self.expr(object);
                if let MemberProp::Computed(prop) = property {
                    self.expr(prop);
                }
            }
            Expr::Call { callee, args } | Expr::New { callee, args } => {
                self.expr(callee);
                for arg in args {
                    self.expr(arg);
                }
            }
            Expr::Update { arg, .. } | Expr::Unary { arg, .. } => self.expr(arg),
            Expr::Binary { lhs, rhs, .. } => {
                self.expr(lhs);
                self.expr(rhs);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test);
                self.expr(consequent);
                self.expr(alternate);
            }
            Expr::Assign { target, value, .. } => {
                self.expr(target);
                self.expr(value);
            }
            Expr::Sequence(items) => {
                for item in items {
                    self.expr(item);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Spanned<Expr> {
        Spanned::dummy(Expr::ident(name))
    }

    /// `f(a, g(b));`
    fn sample_program() -> Program {
        let inner = Spanned::dummy(Expr::call(ident("g"), vec![ident("b")]));
        let outer = Spanned::dummy(Expr::call(ident("f"), vec![ident("a"), inner]));
        Program {
            body: vec![Spanned::dummy(Stmt::Expr(outer))],
            span: Span::dummy(),
        }
    }

    fn visit_order(order: Order) -> Vec<String> {
        let mut program = sample_program();
        let mut seen = Vec::new();
        rewrite_program(&mut program, order, &mut |expr: &mut Spanned<Expr>| {
            match &expr.node {
                Expr::Ident(name) => seen.push(name.clone()),
                Expr::Call { .. } => seen.push("call".to_string()),
                _ => {}
            }
            Rewrite::Unchanged
        });
        seen
    }

    #[test]
    fn test_enter_visits_parent_first() {
        assert_eq!(visit_order(Order::Enter), ["call", "f", "a", "call", "g", "b"]);
    }

    #[test]
    fn test_leave_visits_children_first() {
        assert_eq!(visit_order(Order::Leave), ["f", "a", "g", "b", "call", "call"]);
    }

    #[test]
    fn test_enter_descends_into_replacement() {
        let mut program = sample_program();
        let mut renamed = Vec::new();
        rewrite_program(&mut program, Order::Enter, &mut |expr: &mut Spanned<Expr>| {
            match &expr.node {
                // Replace the outer call with `h(x)`; the walk must see `x`.
                Expr::Call { callee, .. } if matches!(&callee.node, Expr::Ident(n) if n == "f") => {
                    Rewrite::Replace(Spanned::dummy(Expr::call(ident("h"), vec![ident("x")])))
                }
                Expr::Ident(name) => {
                    renamed.push(name.clone());
                    Rewrite::Unchanged
                }
                _ => Rewrite::Unchanged,
            }
        });
        assert_eq!(renamed, ["h", "x"]);
    }

    #[test]
    fn test_leave_does_not_revisit_replacement() {
        let mut program = sample_program();
        let mut calls = 0;
        rewrite_program(&mut program, Order::Leave, &mut |expr: &mut Spanned<Expr>| {
            if matches!(expr.node, Expr::Call { .. }) {
                calls += 1;
                let wrapped = take_expr(expr);
                return Rewrite::Replace(Spanned::dummy(Expr::call(wrapped, Vec::new())));
            }
            Rewrite::Unchanged
        });
        assert_eq!(calls, 2);
    }

    struct IdentCounter(usize);

    impl Visit for IdentCounter {
        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            if matches!(expr.node, Expr::Ident(_)) {
                self.0 += 1;
            }
            walk_expr(self, expr);
        }
    }

    #[test]
    fn test_read_only_visit_sees_all_identifiers() {
        let program = sample_program();
        let mut counter = IdentCounter(0);
        walk_program(&mut counter, &program);
        assert_eq!(counter.0, 4);
    }
}
