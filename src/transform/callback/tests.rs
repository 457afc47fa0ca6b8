use super::*;
use crate::ast::visit::take_expr;
use crate::config::{ParseOptions, PrintOptions};
use crate::format::format_program;

/// Apply `rule` to the first top-level expression statement only.
fn apply(source: &str, rule: fn(Spanned<Expr>) -> Spanned<Expr>) -> String {
    let (mut program, comments) = crate::parse_source(source, &ParseOptions::default()).unwrap();
    match &mut program.body[0].node {
        Stmt::Expr(expr) => {
            let taken = take_expr(expr);
            *expr = rule(taken);
        }
        other => panic!("expected expression statement, got {:?}", other),
    }
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
fn test_node_callback_arity_gate() {
    assert!(is_node_callback(&first_expr("a(function (err, value) {})")));
    assert!(is_node_callback(&first_expr("a(1, 2, function (err, value) {})")));
    assert!(!is_node_callback(&first_expr("a(function (err) {})")));
    assert!(!is_node_callback(&first_expr("a(function (err, value, more) {})")));
    assert!(!is_node_callback(&first_expr("a(function (err, value) {}, 1)")));
    assert!(!is_node_callback(&first_expr("a()")));
    assert!(!is_node_callback(&first_expr("a")));
}

#[test]
fn test_basic_rewrite() {
    assert_eq!(
        apply("a(function (err, value) { console.log(value); });", rewrite_node_callback),
        "a().then(function (value) {\n    console.log(value);\n});"
    );
}

#[test]
fn test_leading_arguments_stay_on_call() {
    assert_eq!(
        apply("fs.readFile(name, 'utf8', function (err, data) { use(data); });", rewrite_node_callback),
        "fs.readFile(name, 'utf8').then(function (data) {\n    use(data);\n});"
    );
}

#[test]
fn test_error_handler_with_block() {
    assert_eq!(
        apply(
            "a(function(err, value){ if(err) { return; } console.log(value); })",
            rewrite_node_callback
        ),
        "a().then(function (value) {\n    console.log(value);\n}, function (err) {\n    return;\n});"
    );
}

#[test]
fn test_error_handler_without_block() {
    assert_eq!(
        apply(
            "a(function(err, value){ if(err) return; console.log(value); })",
            rewrite_node_callback
        ),
        "a().then(function (value) {\n    console.log(value);\n}, function (err) {\n    return;\n});"
    );
}

#[test]
fn test_non_matching_call_is_unchanged() {
    assert_eq!(
        apply("a(function (err) { console.log(err); });", rewrite_node_callback),
        "a(function (err) {\n    console.log(err);\n});"
    );
}

#[test]
fn test_only_first_error_check_is_extracted() {
    assert_eq!(
        apply(
            "a(function (e, v) { if (e) { x(); } if (e) { y(); } })",
            rewrite_node_callback
        ),
        "a().then(function (v) {\n    if (e) {\n        y();\n    }\n}, function (e) {\n    x();\n});"
    );
}

#[test]
fn test_else_branch_moves_into_success_handler() {
    assert_eq!(
        apply("a(function (e, v) { if (e) f(e); else g(v); })", rewrite_node_callback),
        "a().then(function (v) {\n    g(v);\n}, function (e) {\n    f(e);\n});"
    );
    assert_eq!(
        apply(
            "a(function (e, v) { if (e) { x(); } else { y(); w(); } z(v); })",
            rewrite_node_callback
        ),
        "a().then(function (v) {\n    y();\n    w();\n    z(v);\n}, function (e) {\n    x();\n});"
    );
}

#[test]
fn test_else_if_moves_as_one_statement() {
    assert_eq!(
        apply("a(function (e, v) { if (e) f(e); else if (v) g(v); })", rewrite_node_callback),
        "a().then(function (v) {\n    if (v)\n        g(v);\n}, function (e) {\n    f(e);\n});"
    );
}

#[test]
fn test_comment_before_error_check_moves_with_it() {
    let source = "a(function (err, value) {
    // bail out early
    if (err) {
        // log it
        console.error(err);
    }
    console.log(value);
});";
    assert_eq!(
        apply(source, rewrite_node_callback),
        "a().then(function (value) {
    console.log(value);
}, function (err) {
    // bail out early
    // log it
    console.error(err);
});"
    );

    let source = "a(function (err, value) {
    prepare();
    // bail out early
    if (err) return;
    console.log(value);
});";
    assert_eq!(
        apply(source, rewrite_node_callback),
        "a().then(function (value) {
    prepare();
    console.log(value);
}, function (err) {
    // bail out early
    return;
});"
    );
}

fn callback(source: &str) -> Function {
    match first_expr(source).node {
        Expr::Function(func) => *func,
        other => panic!("expected function, got {:?}", other),
    }
}

#[test]
fn test_extractor_ignores_other_error_checks() {
    for source in [
        "(function (v) { if (!err) { a(); } })",
        "(function (v) { if (err !== null) { a(); } })",
        "(function (v) { if (v) { if (err) { a(); } } })",
        "(function (v) { if (error) { a(); } })",
    ] {
        let mut func = callback(source);
        let before = func.clone();
        assert!(extract_error_handler(&mut func, "err").is_none(), "{}", source);
        assert_eq!(func, before);
    }
}

#[test]
fn test_extractor_keeps_surrounding_statements_in_order() {
    let mut func = callback("(function (v) { a(); if (err) { b(); } c(); })");
    let handler = extract_error_handler(&mut func, "err").unwrap();
    assert_eq!(handler.params.len(), 1);
    assert_eq!(handler.params[0].node, "err");
    assert_eq!(handler.body.node.stmts.len(), 1);

    let names: Vec<_> = func
        .body
        .node
        .stmts
        .iter()
        .map(|stmt| match &stmt.node {
            Stmt::Expr(expr) => expr.node.leftmost().clone(),
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(names, [Expr::ident("a"), Expr::ident("c")]);
}

#[test]
fn test_dual_callback_matching() {
    assert!(is_dual_callback(&first_expr("q(x, function (tabs) {}, function (e) {})")));
    assert!(is_dual_callback(&first_expr("q(function () {}, function (e) {})")));
    assert!(!is_dual_callback(&first_expr("q(function (a) {}, function (e, f) {})")));
    assert!(!is_dual_callback(&first_expr("q(1, function (e) {})")));
    // Promise code already.
    assert!(!is_dual_callback(&first_expr("p.then(function (v) {}, function (e) {})")));
    assert!(is_dual_callback(&first_expr("p.done(function (v) {}, function (e) {})")));
}

#[test]
fn test_dual_callback_rewrite_drops_error_callback() {
    assert_eq!(
        apply(
            "chrome.tabs.query(q, function (tabs) { use(tabs); }, function (e) { log(e); });",
            rewrite_dual_callback
        ),
        "chrome.tabs.query(q).then(function (tabs) {\n    use(tabs);\n});"
    );
}

#[test]
fn test_dual_rewrite_ignores_then_calls() {
    assert_eq!(
        apply("p.then(function (v) {}, function (e) {});", rewrite_dual_callback),
        "p.then(function (v) {\n}, function (e) {\n});"
    );
}
