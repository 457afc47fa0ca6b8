use super::*;
use crate::config::ParseOptions;

fn expr(source: &str) -> Expr {
    let (program, _) = crate::parse_source(source, &ParseOptions::default()).unwrap();
    match program.body.into_iter().next().map(|s| s.node) {
        Some(Stmt::Expr(expr)) => expr.node,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_any_matches_everything() {
    assert!(matches(&expr("a"), &Pattern::Any));
    assert!(matches(&expr("a(b)"), &Pattern::Any));
}

#[test]
fn test_absent_parts_are_wildcards() {
    let pattern = Pattern::Call {
        callee: Box::new(Pattern::Any),
        args: Args::Any,
    };
    assert!(matches(&expr("f()"), &pattern));
    assert!(matches(&expr("o.f(1, 2, 3)"), &pattern));
    assert!(!matches(&expr("f"), &pattern));
}

#[test]
fn test_identifier_names() {
    assert!(matches(&expr("err"), &Pattern::Ident(Name::is("err"))));
    assert!(!matches(&expr("error"), &Pattern::Ident(Name::is("err"))));
    assert!(matches(&expr("b"), &Pattern::Ident(Name::one_of(&["a", "b"]))));
    assert!(!matches(&expr("this"), &Pattern::Ident(Name::is("this"))));
}

#[test]
fn test_function_param_count() {
    let two = Pattern::function_with_params(2);
    assert!(matches(&expr("(function (a, b) {})"), &two));
    assert!(!matches(&expr("(function (a) {})"), &two));
    assert!(!matches(&expr("(function (a, b, c) {})"), &two));
}

#[test]
fn test_optional_child_rules() {
    let anonymous = Pattern::Function {
        id: Opt::Absent,
        params: Count::Any,
        last_stmt: Opt::Any,
    };
    assert!(matches(&expr("(function () {})"), &anonymous));
    assert!(!matches(&expr("(function named() {})"), &anonymous));

    let named = Pattern::Function {
        id: Opt::Present(Name::is("named")),
        params: Count::Any,
        last_stmt: Opt::Any,
    };
    assert!(matches(&expr("(function named() {})"), &named));
    assert!(!matches(&expr("(function () {})"), &named));

    let empty_body = Pattern::Function {
        id: Opt::Any,
        params: Count::Any,
        last_stmt: Opt::Absent,
    };
    assert!(matches(&expr("(function () {})"), &empty_body));
    assert!(!matches(&expr("(function () { a(); })"), &empty_body));
}

#[test]
fn test_last_statement_pattern() {
    let pattern = Pattern::Function {
        id: Opt::Any,
        params: Count::Any,
        last_stmt: Opt::Present(Box::new(StmtPattern::Expr(Pattern::method_call(
            &["then"],
            Args::Any,
        )))),
    };
    assert!(matches(&expr("(function () { a(); b().then(c); })"), &pattern));
    assert!(!matches(&expr("(function () { b().then(c); a(); })"), &pattern));
    assert!(!matches(&expr("(function () { return b().then(c); })"), &pattern));
}

#[test]
fn test_member_requires_non_computed_property() {
    let pattern = Pattern::method_call(&["then", "catch"], Args::Any);
    assert!(matches(&expr("p.then(f)"), &pattern));
    assert!(matches(&expr("p.catch(f)"), &pattern));
    assert!(!matches(&expr("p['then'](f)"), &pattern));
    assert!(!matches(&expr("p.done(f)"), &pattern));
}

#[test]
fn test_argument_lists() {
    let f = Pattern::function_with_params(1);
    let prefix = Pattern::Call {
        callee: Box::new(Pattern::Any),
        args: Args::Prefix(vec![f.clone()]),
    };
    let suffix = Pattern::Call {
        callee: Box::new(Pattern::Any),
        args: Args::Suffix(vec![f.clone()]),
    };
    let exact = Pattern::Call {
        callee: Box::new(Pattern::Any),
        args: Args::Exact(vec![Pattern::Any, f]),
    };

    let first = expr("g(function (x) {}, 1)");
    let last = expr("g(1, function (x) {})");
    let none = expr("g()");

    assert!(matches(&first, &prefix));
    assert!(!matches(&last, &prefix));
    assert!(matches(&last, &suffix));
    assert!(!matches(&first, &suffix));
    assert!(matches(&last, &exact));
    assert!(!matches(&first, &exact));
    assert!(!matches(&none, &prefix));
    assert!(!matches(&none, &suffix));
}

#[test]
fn test_not() {
    let pattern = Pattern::Not(Box::new(Pattern::Member {
        object: Box::new(Pattern::Any),
        property: Name::is("then"),
    }));
    assert!(matches(&expr("a.b"), &pattern));
    assert!(matches(&expr("a"), &pattern));
    assert!(!matches(&expr("a.then"), &pattern));
}

#[test]
fn test_if_statement_pattern() {
    let (program, _) =
        crate::parse_source("if (err) return; if (err) a(); else b(); if (e) {}", &ParseOptions::default())
            .unwrap();
    let no_else = StmtPattern::If {
        test: Pattern::Ident(Name::is("err")),
        alternate: Opt::Absent,
    };
    let any_else = StmtPattern::If {
        test: Pattern::Ident(Name::is("err")),
        alternate: Opt::Any,
    };
    assert!(matches_stmt(&program.body[0].node, &no_else));
    assert!(!matches_stmt(&program.body[1].node, &no_else));
    assert!(matches_stmt(&program.body[1].node, &any_else));
    assert!(!matches_stmt(&program.body[2].node, &any_else));
}
