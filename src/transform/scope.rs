//! Free-variable analysis of function literals.
//!
//! A name is free in a function when the function references it but does
//! not declare it. ES5 scoping is function-level: parameters, `var`
//! declarations anywhere in the body, and function declarations all bind
//! for the whole function. Nested functions are analysed on their own and
//! contribute only their free names.

use std::collections::BTreeSet;

use crate::ast::visit::{self, Visit};
use crate::ast::*;
use crate::span::Spanned;

pub type ScopeSet = BTreeSet<String>;

/// Names every function binds implicitly.
const IMPLICIT: [&str; 2] = ["arguments", "this"];

/// Names referenced inside `func` and declared outside it.
pub fn free_variables(func: &Function) -> ScopeSet {
    let mut collector = Collector::default();
    collector.visit_block(&func.body);

    let mut declared = collector.declared;
    declared.extend(func.params.iter().map(|p| p.node.clone()));
    if let Some(id) = &func.id {
        declared.insert(id.node.clone());
    }
    declared.extend(IMPLICIT.iter().map(|name| name.to_string()));

    collector
        .referenced
        .into_iter()
        .filter(|name| !declared.contains(name))
        .collect()
}

/// Names referenced by an arbitrary expression. `this` and `arguments`
/// count as references.
pub fn free_in_expr(expr: &Spanned<Expr>) -> ScopeSet {
    let mut collector = Collector::default();
    collector.visit_expr(expr);
    collector.referenced
}

#[derive(Default)]
struct Collector {
    referenced: ScopeSet,
    declared: ScopeSet,
}

impl Visit for Collector {
    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        match &expr.node {
            Expr::Ident(name) => {
                self.referenced.insert(name.clone());
            }
            Expr::This => {
                self.referenced.insert("this".to_string());
            }
            _ => visit::walk_expr(self, expr),
        }
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        if let Stmt::Function(Function { id: Some(id), .. }) = &stmt.node {
            self.declared.insert(id.node.clone());
        }
        visit::walk_stmt(self, stmt);
    }

    /// Nested functions are opaque: only their own free names escape.
    fn visit_function(&mut self, func: &Function) {
        self.referenced.extend(free_variables(func));
    }

    fn visit_declarator(&mut self, decl: &VarDeclarator) {
        self.declared.insert(decl.name.node.clone());
        if let Some(init) = &decl.init {
            self.visit_expr(init);
        }
    }

    /// The catch parameter is bound in the catch body only; `var`s inside
    /// still belong to the enclosing function.
    fn visit_catch(&mut self, clause: &CatchClause) {
        let mut inner = Collector::default();
        inner.visit_block(&clause.body);
        inner.referenced.remove(&clause.param.node);
        self.referenced.extend(inner.referenced);
        self.declared.extend(inner.declared);
    }
}
