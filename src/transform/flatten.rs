//! Chain flattening.
//!
//! A handler whose last statement starts another promise chain,
//!
//! ```text
//! a().then(function (x) { s; b(x).then(next); })
//! ```
//!
//! is rewritten so the inner chain continues at the outer level:
//!
//! ```text
//! a().then(function (x) { s; return b(x); }).then(next)
//! ```
//!
//! A tail of several links, `b(x).then(f).catch(g)`, moves out whole.
//!
//! Moving `next` out of the handler changes what it can see. The rewrite
//! is only done when every name the moved handlers reference is also free
//! in the enclosing handler, so nothing the handler declares is lost.

use std::sync::OnceLock;

use tracing::debug;

use super::pattern::{self, Args, Count, Opt, Pattern, StmtPattern};
use super::scope::{free_in_expr, free_variables, ScopeSet};
use crate::ast::visit::{take_expr, Rewrite};
use crate::ast::*;
use crate::span::{Span, Spanned};

/// The method continuing a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TailOp {
    Then,
    Catch,
}

impl TailOp {
    pub fn as_str(self) -> &'static str {
        match self {
            TailOp::Then => "then",
            TailOp::Catch => "catch",
        }
    }

    fn from_name(name: &str) -> Option<TailOp> {
        match name {
            "then" => Some(TailOp::Then),
            "catch" => Some(TailOp::Catch),
            _ => None,
        }
    }
}

const CHAIN_METHODS: [&str; 2] = ["then", "catch"];

fn tail_chain_pattern() -> &'static Pattern {
    static PATTERN: OnceLock<Pattern> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let tail = StmtPattern::Expr(Pattern::method_call(&CHAIN_METHODS, Args::Any));
        Pattern::method_call(
            &CHAIN_METHODS,
            Args::Prefix(vec![Pattern::Function {
                id: Opt::Any,
                params: Count::Any,
                last_stmt: Opt::Present(Box::new(tail)),
            }]),
        )
    })
}

/// `p.then(function () { ...; q.then(...); })`: a `.then`/`.catch` call
/// whose first handler ends by starting another chain. Returns the method
/// of the last link of that inner chain.
pub fn is_tail_chain_call(expr: &Spanned<Expr>) -> Option<TailOp> {
    if !pattern::matches(&expr.node, tail_chain_pattern()) {
        return None;
    }
    chain_op(tail_call(handler(&expr.node)?)?)
}

/// Flatten a tail chain call, repeatedly, for as long as it stays safe.
pub fn flatten(expr: &mut Spanned<Expr>) -> Rewrite {
    if !hoistable(expr) {
        return Rewrite::Unchanged;
    }
    let mut current = hoist(take_expr(expr));
    while hoistable(&current) {
        current = hoist(current);
    }
    Rewrite::Replace(current)
}

fn hoistable(expr: &Spanned<Expr>) -> bool {
    is_tail_chain_call(expr).is_some() && can_hoist(expr)
}

/// True when every link of the inner chain only references names that are
/// already free in the enclosing handler. The links move out together or
/// not at all.
fn can_hoist(expr: &Spanned<Expr>) -> bool {
    let Some(handler) = handler(&expr.node) else {
        return false;
    };
    let Some(tail) = tail_call(handler) else {
        return false;
    };
    let enclosing = free_variables(handler);
    let captured: ScopeSet = link_args(tail)
        .into_iter()
        .flatten()
        .flat_map(free_in_expr)
        .filter(|name| !enclosing.contains(name))
        .collect();
    if captured.is_empty() {
        return true;
    }
    debug!(?captured, "not flattening: tail handlers capture enclosing names");
    false
}

fn handler(call: &Expr) -> Option<&Function> {
    match call {
        Expr::Call { args, .. } => args.first()?.node.as_function(),
        _ => None,
    }
}

fn handler_stmts(call: &mut Expr) -> Option<&mut Vec<Spanned<Stmt>>> {
    match call {
        Expr::Call { args, .. } => {
            let func = args.first_mut()?.node.as_function_mut()?;
            Some(&mut func.body.node.stmts)
        }
        _ => None,
    }
}

/// The expression of the handler's last statement, if it is an
/// expression statement.
fn tail_call(handler: &Function) -> Option<&Expr> {
    match &handler.body.node.stmts.last()?.node {
        Stmt::Expr(expr) => Some(&expr.node),
        _ => None,
    }
}

fn chain_op(expr: &Expr) -> Option<TailOp> {
    expr.method_name().and_then(TailOp::from_name)
}

/// Argument lists of the `.then`/`.catch` links ending `expr`, last link
/// first.
fn link_args(mut expr: &Expr) -> Vec<&[Spanned<Expr>]> {
    let mut links = Vec::new();
    while chain_op(expr).is_some() {
        let Expr::Call { callee, args } = expr else {
            break;
        };
        let Expr::Member { object, .. } = &callee.node else {
            break;
        };
        links.push(args.as_slice());
        expr = &object.node;
    }
    links
}

/// Replace the handler's last statement `inner.op1(a).op2(b);` with
/// `return inner;` and continue the chain: `node.op1(a).op2(b)`.
fn hoist(mut node: Spanned<Expr>) -> Spanned<Expr> {
    let Some(stmts) = handler_stmts(&mut node.node) else {
        return node;
    };
    let Some(last) = stmts.pop() else {
        return node;
    };
    match split_tail(last) {
        Ok((inner, links, span)) => {
            stmts.push(Spanned::new(Stmt::ret(inner), span));
            debug!(links = links.len(), "flattened nested chain");
            links.into_iter().fold(node, |chain, link| {
                Spanned::dummy(Expr::method_call(chain, link.op.as_str(), link.args))
            })
        }
        Err(last) => {
            stmts.push(last);
            node
        }
    }
}

/// One `.then(...)`/`.catch(...)` call of a chain.
struct Link {
    op: TailOp,
    args: Vec<Spanned<Expr>>,
}

type SplitTail = (Spanned<Expr>, Vec<Link>, Span);

/// Take `inner.op1(a).op2(b);` apart into `inner`, the links in call
/// order and the statement's span. Anything else is handed back untouched.
fn split_tail(stmt: Spanned<Stmt>) -> Result<SplitTail, Spanned<Stmt>> {
    let span = stmt.span;
    let mut expr = match stmt.node {
        Stmt::Expr(expr) => expr,
        node => return Err(Spanned::new(node, span)),
    };
    let mut links = Vec::new();
    loop {
        match peel_link(expr) {
            Ok((object, link)) => {
                links.push(link);
                expr = object;
            }
            Err(rest) => {
                expr = rest;
                break;
            }
        }
    }
    if links.is_empty() {
        return Err(Spanned::new(Stmt::Expr(expr), span));
    }
    links.reverse();
    Ok((expr, links, span))
}

/// `object.then(args)` into `object` and its link.
fn peel_link(expr: Spanned<Expr>) -> Result<(Spanned<Expr>, Link), Spanned<Expr>> {
    let Some(op) = chain_op(&expr.node) else {
        return Err(expr);
    };
    let Spanned { node, span } = expr;
    match node {
        Expr::Call { callee, args } => match *callee {
            Spanned {
                node: Expr::Member { object, .. },
                ..
            } => Ok((*object, Link { op, args })),
            callee => Err(Spanned::new(
                Expr::Call {
                    callee: Box::new(callee),
                    args,
                },
                span,
            )),
        },
        node => Err(Spanned::new(node, span)),
    }
}

#[cfg(test)]
mod tests;
