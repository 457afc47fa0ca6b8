//! The conversion passes.
//!
//! Passes run over the whole tree in a fixed order. The node-style and
//! dual-callback rewrites run leave-order so inner callbacks are converted
//! before the calls that contain them; flattening then runs enter-order
//! over the `.then` chains they produced.

pub mod callback;
pub mod flatten;
pub mod pattern;
pub mod scope;

use tracing::debug;

use crate::ast::visit::{rewrite_program, take_expr, Order, Rewrite};
use crate::ast::{Expr, Program};
use crate::config::Rules;
use crate::span::Spanned;

/// Decides whether a rule applies to an expression.
pub type Matcher = fn(&Spanned<Expr>) -> bool;

/// Builds the replacement for a matched expression.
pub type Rewriter = fn(Spanned<Expr>) -> Spanned<Expr>;

/// Rewrites an expression in place of the walk, returning the outcome.
pub type Flattener = fn(&mut Spanned<Expr>) -> Rewrite;

/// Run every pass over `program` in order: node-style callbacks, dual
/// callbacks, chain flattening.
pub fn run_passes(program: &mut Program, rules: &Rules) {
    let node_style = rewrite_pass(program, rules.matcher, rules.rewriter);
    let dual = rewrite_pass(program, rules.matcher_dual, rules.rewriter_dual);

    let mut flattened = 0usize;
    rewrite_program(program, Order::Enter, &mut |expr: &mut Spanned<Expr>| {
        let outcome = (rules.flattener)(expr);
        if matches!(outcome, Rewrite::Replace(_)) {
            flattened += 1;
        }
        outcome
    });

    debug!(node_style, dual, flattened, "conversion passes complete");
}

/// One leave-order walk applying `rewriter` wherever `matcher` accepts.
/// Returns the number of rewrites.
fn rewrite_pass(program: &mut Program, matcher: Matcher, rewriter: Rewriter) -> usize {
    let mut count = 0usize;
    rewrite_program(program, Order::Leave, &mut |expr: &mut Spanned<Expr>| {
        if !matcher(expr) {
            return Rewrite::Unchanged;
        }
        count += 1;
        Rewrite::Replace(rewriter(take_expr(expr)))
    });
    count
}
