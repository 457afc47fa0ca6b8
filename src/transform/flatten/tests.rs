use super::*;
use crate::ast::visit::{rewrite_program, Order};
use crate::config::{ParseOptions, PrintOptions};
use crate::format::format_program;

fn flatten_source(source: &str) -> String {
    let (mut program, comments) = crate::parse_source(source, &ParseOptions::default()).unwrap();
    rewrite_program(&mut program, Order::Enter, &mut flatten);
    format_program(&program, &comments, &PrintOptions::default())
}

fn first_expr(source: &str) -> Spanned<Expr> {
    let (program, _) = crate::parse_source(source, &ParseOptions::default()).unwrap();
    match program.body.into_iter().next().map(|s| s.node) {
        Some(Stmt::Expr(expr)) => expr,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_tail_chain_predicate() {
    assert_eq!(
        is_tail_chain_call(&first_expr("a().then(function (x) { b(x).then(c); })")),
        Some(TailOp::Then)
    );
    assert_eq!(
        is_tail_chain_call(&first_expr("a().then(function (x) { b(x).catch(c); })")),
        Some(TailOp::Catch)
    );
    assert_eq!(
        is_tail_chain_call(&first_expr("a().catch(function (x) { b(x).then(c); })")),
        Some(TailOp::Then)
    );
    assert_eq!(
        is_tail_chain_call(&first_expr("a().then(function (x) { b(x).catch(c).then(d); })")),
        Some(TailOp::Then)
    );
    // Extra arguments on the outer call do not disqualify it.
    assert_eq!(
        is_tail_chain_call(&first_expr("a().then(function (x) { b(x).then(c); }, onError)")),
        Some(TailOp::Then)
    );
}

#[test]
fn test_tail_chain_predicate_rejects() {
    for source in [
        "a().then(function (x) { return b(x).then(c); })",
        "a().then(function (x) { b(x).then(c); d(); })",
        "a().then(function (x) { b(x).done(c); })",
        "a().then(function (x) { b(x)['then'](c); })",
        "a().done(function (x) { b(x).then(c); })",
        "a().then(f)",
        "a().then(function (x) {})",
        "a(function (x) { b(x).then(c); })",
    ] {
        assert_eq!(is_tail_chain_call(&first_expr(source)), None, "{}", source);
    }
}

#[test]
fn test_flattens_one_level() {
    assert_eq!(
        flatten_source("a().then(function (valueA) { b(valueA).then(function (c) {}); });"),
        "a().then(function (valueA) {\n    return b(valueA);\n}).then(function (c) {\n});"
    );
}

#[test]
fn test_flattens_several_levels() {
    assert_eq!(
        flatten_source(
            "a().then(function (x) { b(x).then(function (y) { c(y).then(function (z) { log(z); }); }); });"
        ),
        "a().then(function (x) {\n    return b(x);\n}).then(function (y) {\n    return c(y);\n}).then(function (z) {\n    log(z);\n});"
    );
}

#[test]
fn test_statements_before_tail_are_kept() {
    assert_eq!(
        flatten_source("a().then(function (x) { log(x); b(x).then(done); });"),
        "a().then(function (x) {\n    log(x);\n    return b(x);\n}).then(done);"
    );
}

#[test]
fn test_multi_link_tail_moves_out_in_order() {
    let once = flatten_source("p.then(function (v) { q(v).then(f).catch(g); });");
    assert_eq!(once, "p.then(function (v) {\n    return q(v);\n}).then(f).catch(g);");
    assert_eq!(flatten_source(&once), once);
}

#[test]
fn test_multi_link_tail_with_one_capturing_link_stays() {
    let source = "p.then(function (v) { q().then(function (w) { use(v, w); }).then(done); });";
    assert_eq!(
        flatten_source(source),
        "p.then(function (v) {\n    q().then(function (w) {\n        use(v, w);\n    }).then(done);\n});"
    );
}

#[test]
fn test_catch_tail_keeps_its_name() {
    assert_eq!(
        flatten_source("a().then(function (x) { b(x).catch(function (e) { log(e); }); });"),
        "a().then(function (x) {\n    return b(x);\n}).catch(function (e) {\n    log(e);\n});"
    );
}

#[test]
fn test_outer_rejection_handler_stays_on_outer_call() {
    assert_eq!(
        flatten_source(
            "a().then(function (x) { b(x).then(function (y) {}); }, function (err) { log(err); });"
        ),
        "a().then(function (x) {\n    return b(x);\n}, function (err) {\n    log(err);\n}).then(function (y) {\n});"
    );
}

#[test]
fn test_captured_parameter_blocks_flattening() {
    let source = "a().then(function (x) { b(x).then(function (y) { use(x, y); }); });";
    assert_eq!(
        flatten_source(source),
        "a().then(function (x) {\n    b(x).then(function (y) {\n        use(x, y);\n    });\n});"
    );
}

#[test]
fn test_captured_local_blocks_flattening() {
    let source = "a().then(function () { var v = 1; b().then(function () { use(v); }); });";
    assert_eq!(
        flatten_source(source),
        "a().then(function () {\n    var v = 1;\n    b().then(function () {\n        use(v);\n    });\n});"
    );
}

#[test]
fn test_captured_name_in_rejection_handler_blocks_flattening() {
    let source = "a().then(function (x) { b().then(function () {}, function (e) { log(x, e); }); });";
    assert_eq!(
        flatten_source(source),
        "a().then(function (x) {\n    b().then(function () {\n    }, function (e) {\n        log(x, e);\n    });\n});"
    );
}

#[test]
fn test_non_function_tail_argument() {
    // `done` is free in the handler, so it can move.
    assert_eq!(
        flatten_source("a().then(function () { b().then(done); });"),
        "a().then(function () {\n    return b();\n}).then(done);"
    );
    // `this` means something else once outside the handler.
    assert_eq!(
        flatten_source("a().then(function () { b().then(this.done); });"),
        "a().then(function () {\n    b().then(this.done);\n});"
    );
}

#[test]
fn test_blocked_outer_level_still_flattens_inside() {
    // The outer hoist is refused, the walk then reaches the inner chain.
    let source = "a().then(function (x) { b().then(function (y) { log(x); c(y).then(function (z) { log(z); }); }); });";
    let once = flatten_source(source);
    assert_eq!(
        once,
        "a().then(function (x) {\n    b().then(function (y) {\n        log(x);\n        return c(y);\n    }).then(function (z) {\n        log(z);\n    });\n});"
    );
    // The outer handler now ends in two links; the first still captures `x`.
    assert_eq!(flatten_source(&once), once);
}

#[test]
fn test_flatten_is_unchanged_without_match() {
    let mut expr = first_expr("a(b)");
    assert_eq!(flatten(&mut expr), Rewrite::Unchanged);
}
