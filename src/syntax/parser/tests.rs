use super::*;
use crate::lexer::Lexer;

fn parse(source: &str) -> Program {
    let (tokens, _comments, lex_diags) = Lexer::new(source).tokenize();
    assert!(lex_diags.is_empty(), "lex errors: {:?}", lex_diags);
    Parser::new(tokens).parse_program().unwrap()
}

fn parse_err(source: &str) -> Vec<Diagnostic> {
    let (tokens, _comments, _) = Lexer::new(source).tokenize();
    Parser::new(tokens).parse_program().unwrap_err()
}

fn first_expr(program: &Program) -> &Expr {
    match &program.body[0].node {
        Stmt::Expr(expr) => &expr.node,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_empty_program() {
    let program = parse("");
    assert!(program.body.is_empty());
}

#[test]
fn test_call_with_function_argument() {
    let program = parse("a(1, function (err, value) { b(value); });");
    assert_eq!(program.body.len(), 1);
    if let Expr::Call { callee, args } = first_expr(&program) {
        assert_eq!(callee.node, Expr::ident("a"));
        assert_eq!(args.len(), 2);
        let func = args[1].node.as_function().expect("function argument");
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.params[0].node, "err");
        assert_eq!(func.body.node.stmts.len(), 1);
    } else {
        panic!("expected call");
    }
}

#[test]
fn test_binary_precedence() {
    let program = parse("a + b * c;");
    if let Expr::Binary { op, rhs, .. } = first_expr(&program) {
        assert_eq!(*op, BinOp::Add);
        assert!(matches!(rhs.node, Expr::Binary { op: BinOp::Mul, .. }));
    } else {
        panic!("expected binary op");
    }
}

#[test]
fn test_binary_left_associative() {
    let program = parse("a - b - c;");
    if let Expr::Binary { lhs, rhs, .. } = first_expr(&program) {
        assert!(matches!(lhs.node, Expr::Binary { op: BinOp::Sub, .. }));
        assert_eq!(rhs.node, Expr::ident("c"));
    } else {
        panic!("expected binary op");
    }
}

#[test]
fn test_assignment_right_associative() {
    let program = parse("a = b = c;");
    if let Expr::Assign { value, .. } = first_expr(&program) {
        assert!(matches!(value.node, Expr::Assign { .. }));
    } else {
        panic!("expected assignment");
    }
}

#[test]
fn test_method_chain() {
    let program = parse("a().then(f).then(g);");
    let expr = first_expr(&program);
    assert_eq!(expr.method_name(), Some("then"));
    assert!(matches!(expr.leftmost(), Expr::Ident(name) if name == "a"));
}

#[test]
fn test_new_with_and_without_arguments() {
    let program = parse("new Foo; new a.B(1).c;");
    assert!(matches!(first_expr(&program), Expr::New { args, .. } if args.is_empty()));
    if let Stmt::Expr(expr) = &program.body[1].node {
        // `.c` applies to the constructed object.
        if let Expr::Member { object, .. } = &expr.node {
            assert!(matches!(&object.node, Expr::New { args, .. } if args.len() == 1));
        } else {
            panic!("expected member access");
        }
    }
}

#[test]
fn test_keyword_property_names() {
    let program = parse("p.catch(f); x = { default: 1, 'q': 2, 3: 4 };");
    assert_eq!(first_expr(&program).method_name(), Some("catch"));
    if let Stmt::Expr(expr) = &program.body[1].node {
        if let Expr::Assign { value, .. } = &expr.node {
            if let Expr::Object(props) = &value.node {
                assert_eq!(props[0].key.node, PropKey::Ident("default".into()));
                assert_eq!(props[1].key.node, PropKey::String("'q'".into()));
                assert_eq!(props[2].key.node, PropKey::Number("3".into()));
                return;
            }
        }
    }
    panic!("expected object assignment");
}

#[test]
fn test_getter_and_setter() {
    let program = parse("o = { get x() { return 1; }, set x(v) {}, get: 3 };");
    if let Expr::Assign { value, .. } = first_expr(&program) {
        if let Expr::Object(props) = &value.node {
            assert_eq!(props[0].kind, PropKind::Get);
            assert_eq!(props[1].kind, PropKind::Set);
            assert_eq!(props[2].kind, PropKind::Init);
            assert_eq!(props[2].key.node, PropKey::Ident("get".into()));
            return;
        }
    }
    panic!("expected object");
}

#[test]
fn test_array_elisions() {
    let program = parse("x = [a, , b,];");
    if let Expr::Assign { value, .. } = first_expr(&program) {
        if let Expr::Array(items) = &value.node {
            assert_eq!(items.len(), 3);
            assert!(items[1].is_none());
            return;
        }
    }
    panic!("expected array");
}

#[test]
fn test_automatic_semicolons() {
    let program = parse("a()\nb()\nfunction f() { return }");
    assert_eq!(program.body.len(), 3);
}

#[test]
fn test_return_on_its_own_line() {
    let program = parse("function f() {\n    return\n    x;\n}");
    if let Stmt::Function(func) = &program.body[0].node {
        let stmts = &func.body.node.stmts;
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].node, Stmt::Return(None));
    } else {
        panic!("expected function declaration");
    }
}

#[test]
fn test_postfix_increment_needs_same_line() {
    let program = parse("a\n++b");
    assert_eq!(program.body.len(), 2);
    if let Stmt::Expr(expr) = &program.body[1].node {
        assert!(matches!(expr.node, Expr::Update { prefix: true, .. }));
    }
}

#[test]
fn test_missing_semicolon_is_error() {
    let diags = parse_err("a b");
    assert!(diags[0].message.contains("expected ';'"));
}

#[test]
fn test_for_loops() {
    let program = parse(
        "for (var i = 0, n = a.length; i < n; i++) {}\nfor (var k in o) {}\nfor (x.y in o);\nfor (;;) break;",
    );
    assert!(matches!(&program.body[0].node, Stmt::For { init: Some(ForInit::Var(d)), .. } if d.len() == 2));
    assert!(matches!(&program.body[1].node, Stmt::ForIn { left: ForInTarget::Var(_), .. }));
    assert!(matches!(&program.body[2].node, Stmt::ForIn { left: ForInTarget::Expr(_), .. }));
    assert!(matches!(&program.body[3].node, Stmt::For { init: None, test: None, update: None, .. }));
}

#[test]
fn test_in_operator_inside_for_test() {
    let program = parse("for (var i = 0; 'k' in o; ) {}");
    if let Stmt::For { test: Some(test), .. } = &program.body[0].node {
        assert!(matches!(test.node, Expr::Binary { op: BinOp::In, .. }));
    } else {
        panic!("expected for loop");
    }
}

#[test]
fn test_try_catch_finally() {
    let program = parse("try { a(); } catch (e) { b(e); } finally { c(); }");
    if let Stmt::Try {
        handler, finalizer, ..
    } = &program.body[0].node
    {
        assert_eq!(handler.as_ref().map(|h| h.param.node.as_str()), Some("e"));
        assert!(finalizer.is_some());
    } else {
        panic!("expected try");
    }
}

#[test]
fn test_try_without_handler_is_error() {
    let diags = parse_err("try { a(); }");
    assert!(diags[0].message.contains("'try' without"));
}

#[test]
fn test_switch_cases() {
    let program = parse("switch (x) { case 1: a(); break; default: b(); }");
    if let Stmt::Switch { cases, .. } = &program.body[0].node {
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].node.body.len(), 2);
        assert!(cases[1].node.test.is_none());
    } else {
        panic!("expected switch");
    }
}

#[test]
fn test_labeled_statement() {
    let program = parse("outer: for (;;) { continue outer; }");
    assert!(matches!(&program.body[0].node, Stmt::Labeled { label, .. } if label.node == "outer"));
}

#[test]
fn test_with_is_rejected() {
    let diags = parse_err("with (o) { a(); }");
    assert!(diags[0].message.contains("'with'"));
}

#[test]
fn test_invalid_assignment_target() {
    let diags = parse_err("a() = 1;");
    assert!(diags[0].message.contains("invalid assignment target"));
}

#[test]
fn test_anonymous_function_declaration_is_error() {
    let diags = parse_err("function () {}");
    assert!(diags[0].message.contains("requires a name"));
}

#[test]
fn test_unexpected_token() {
    let diags = parse_err("a(;");
    assert!(diags[0].message.contains("expected expression"));
}

#[test]
fn test_nesting_limit() {
    let source = format!("x = {}1{};", "(".repeat(20), ")".repeat(20));
    let (tokens, _, _) = Lexer::new(&source).tokenize();
    let diags = Parser::new(tokens).with_max_depth(8).parse_program().unwrap_err();
    assert!(diags[0].message.contains("nesting depth exceeded"));

    let (tokens, _, _) = Lexer::new(&source).tokenize();
    assert!(Parser::new(tokens).parse_program().is_ok());
}

#[test]
fn test_long_operator_chain_hits_nesting_limit() {
    let long = format!("x = {}1;", "1 + ".repeat(5000));
    let diags = parse_err(&long);
    assert!(diags[0].message.contains("nesting depth exceeded"));

    let short = format!("x = {}1;", "1 + ".repeat(100));
    parse(&short);
}

#[test]
fn test_long_member_chain_hits_nesting_limit() {
    let diags = parse_err(&format!("x = a{};", ".b".repeat(5000)));
    assert!(diags[0].message.contains("nesting depth exceeded"));

    let diags = parse_err(&format!("x = a{};", "()".repeat(5000)));
    assert!(diags[0].message.contains("nesting depth exceeded"));

    let diags = parse_err(&format!("x = new a{};", ".b".repeat(5000)));
    assert!(diags[0].message.contains("nesting depth exceeded"));

    parse(&format!("a{};", ".then(f)".repeat(100)));
}

#[test]
fn test_statement_spans() {
    let program = parse("a();\n  b(1);");
    assert_eq!(program.body[0].span, Span::new(0, 4));
    assert_eq!(program.body[1].span, Span::new(7, 12));
    assert_eq!(program.span, Span::new(0, 12));
}

#[test]
fn test_regex_and_division_in_expressions() {
    let program = parse("x = a / 2; y = /ab+c/i.test(s);");
    assert_eq!(program.body.len(), 2);
}
