//! Callback rules: recognise a trailing callback argument and move it into
//! a `.then` call on the call it was passed to.
//!
//! Two conventions are understood:
//!
//! - node style, `f(args, function (err, value) { ... })`
//! - dual callback, `f(args, function (value) { ... }, function (err) { ... })`

use std::sync::OnceLock;

use tracing::debug;

use super::pattern::{self, Args, Count, Name, Opt, Pattern, StmtPattern};
use crate::ast::*;
use crate::span::{Span, Spanned};

fn node_callback_pattern() -> &'static Pattern {
    static PATTERN: OnceLock<Pattern> = OnceLock::new();
    PATTERN.get_or_init(|| Pattern::Call {
        callee: Box::new(Pattern::Any),
        args: Args::Suffix(vec![Pattern::function_with_params(2)]),
    })
}

fn dual_callback_pattern() -> &'static Pattern {
    static PATTERN: OnceLock<Pattern> = OnceLock::new();
    PATTERN.get_or_init(|| Pattern::Call {
        // `p.then(onSuccess, onError)` is already promise code.
        callee: Box::new(Pattern::Not(Box::new(Pattern::Member {
            object: Box::new(Pattern::Any),
            property: Name::is("then"),
        }))),
        args: Args::Suffix(vec![
            Pattern::Function {
                id: Opt::Any,
                params: Count::Any,
                last_stmt: Opt::Any,
            },
            Pattern::function_with_params(1),
        ]),
    })
}

/// A call whose last argument is a function literal taking exactly
/// `(error, value)`.
pub fn is_node_callback(expr: &Spanned<Expr>) -> bool {
    pattern::matches(&expr.node, node_callback_pattern())
}

/// A call ending in a success callback followed by a one-parameter error
/// callback.
pub fn is_dual_callback(expr: &Spanned<Expr>) -> bool {
    pattern::matches(&expr.node, dual_callback_pattern())
}

/// `f(x, function (err, v) { ... })` becomes
/// `f(x).then(function (v) { ... }[, function (err) { ... }])`.
///
/// The rejection handler is present when the callback tested `err` with a
/// top-level `if`. Expressions that do not match are returned unchanged.
pub fn rewrite_node_callback(mut expr: Spanned<Expr>) -> Spanned<Expr> {
    if !is_node_callback(&expr) {
        return expr;
    }
    let Some((mut callback, span)) = pop_callback(&mut expr) else {
        return expr;
    };

    let error_param = callback.params.remove(0);
    let rejection = extract_error_handler(&mut callback, &error_param.node);
    debug!(
        error_param = %error_param.node,
        rejection_handler = rejection.is_some(),
        "rewrote node-style callback"
    );

    let mut then_args = vec![Spanned::new(Expr::Function(callback), span)];
    if let Some(handler) = rejection {
        then_args.push(Spanned::dummy(Expr::Function(Box::new(handler))));
    }
    Spanned::dummy(Expr::method_call(expr, "then", then_args))
}

/// `f(x, onSuccess, onError)` becomes `f(x).then(onSuccess)`.
///
/// The error callback is dropped.
pub fn rewrite_dual_callback(mut expr: Spanned<Expr>) -> Spanned<Expr> {
    if !is_dual_callback(&expr) {
        return expr;
    }
    let Some((on_error, _)) = pop_callback(&mut expr) else {
        return expr;
    };
    let Some((on_success, span)) = pop_callback(&mut expr) else {
        return expr;
    };
    debug!(
        dropped_param = on_error.params.first().map(|p| p.node.as_str()).unwrap_or(""),
        "rewrote dual callback, error callback dropped"
    );
    Spanned::dummy(Expr::method_call(
        expr,
        "then",
        vec![Spanned::new(Expr::Function(on_success), span)],
    ))
}

/// Split the error branch out of a node-style callback.
///
/// Looks for the first top-level `if (<error_param>) ...` in the body,
/// removes it, and returns `function (<error_param>) { <consequent> }`.
/// The statements of an `else` branch take the place of the `if` in the
/// callback. Comments just before the `if` move with the handler. Later
/// statements that mention the error are left where they are.
pub fn extract_error_handler(callback: &mut Function, error_param: &str) -> Option<Function> {
    let test = StmtPattern::If {
        test: Pattern::Ident(Name::is(error_param)),
        alternate: Opt::Any,
    };
    let body_span = callback.body.span;
    let stmts = &mut callback.body.node.stmts;
    let index = stmts
        .iter()
        .position(|stmt| pattern::matches_stmt(&stmt.node, &test))?;
    let comments_from = match index {
        0 => Some(body_span).filter(|span| !span.is_dummy()).map(|span| span.start),
        i => Some(stmts[i - 1].span).filter(|span| !span.is_dummy()).map(|span| span.end),
    };

    let (consequent, alternate) = match stmts.remove(index) {
        Spanned {
            node: Stmt::If {
                consequent,
                alternate,
                ..
            },
            ..
        } => (consequent, alternate),
        other => {
            stmts.insert(index, other);
            return None;
        }
    };
    if let Some(alternate) = alternate {
        let Spanned { node, span } = *alternate;
        let moved = match node {
            Stmt::Block(block) => block.stmts,
            other => vec![Spanned::new(other, span)],
        };
        stmts.splice(index..index, moved);
    }

    let Spanned { node, span } = *consequent;
    let body_span = handler_span(comments_from, span);
    let body = match node {
        Stmt::Block(block) => Spanned::new(block, body_span),
        other => Spanned::new(
            Block {
                stmts: vec![Spanned::new(other, span)],
            },
            body_span,
        ),
    };
    Some(Function::anonymous(
        vec![Spanned::dummy(error_param.to_string())],
        body,
    ))
}

/// The consequent's span widened back to `from`: the printer hands the
/// comments in that range to the handler's body.
fn handler_span(from: Option<u32>, consequent: Span) -> Span {
    match from {
        Some(start) if !consequent.is_dummy() && start <= consequent.start => {
            Span::new(start, consequent.end)
        }
        _ => consequent,
    }
}

/// Remove the trailing argument of a call if it is a function literal.
fn pop_callback(call: &mut Spanned<Expr>) -> Option<(Box<Function>, Span)> {
    let Expr::Call { args, .. } = &mut call.node else {
        return None;
    };
    match args.pop() {
        Some(Spanned {
            node: Expr::Function(func),
            span,
        }) => Some((func, span)),
        Some(other) => {
            args.push(other);
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests;
