use crate::ast::*;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

use super::stmt::is_assignable;
use super::Parser;

impl Parser {
    /// Comma-separated expression. `no_in` disables the `in` operator, as
    /// required in a `for` initializer.
    pub(super) fn parse_expr(&mut self, no_in: bool) -> Spanned<Expr> {
        let first = self.parse_assign(no_in);
        if !self.at(&Lexeme::Comma) {
            return first;
        }
        let start = first.span;
        let mut items = vec![first];
        while self.eat(&Lexeme::Comma) {
            items.push(self.parse_assign(no_in));
        }
        Spanned::new(Expr::Sequence(items), self.span_from(start))
    }

    pub(super) fn parse_assign(&mut self, no_in: bool) -> Spanned<Expr> {
        let start = self.current_span();
        if !self.enter_nesting() {
            return error_expr(start);
        }
        let target = self.parse_conditional(no_in);
        let expr = match assign_op(self.peek()) {
            Some(op) => {
                if !is_assignable(&target.node) {
                    self.error_at_current("invalid assignment target");
                }
                self.advance();
                let value = self.parse_assign(no_in);
                let span = self.span_from(target.span);
                Spanned::new(
                    Expr::Assign {
                        op,
                        target: Box::new(target),
                        value: Box::new(value),
                    },
                    span,
                )
            }
            None => target,
        };
        self.exit_nesting();
        expr
    }

    fn parse_conditional(&mut self, no_in: bool) -> Spanned<Expr> {
        let test = self.parse_binary(Precedence::LogicalOr, no_in);
        if !self.eat(&Lexeme::Question) {
            return test;
        }
        let consequent = self.parse_assign(false);
        self.expect(&Lexeme::Colon);
        let alternate = self.parse_assign(no_in);
        let span = self.span_from(test.span);
        Spanned::new(
            Expr::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        )
    }

    /// Precedence climbing over the left-associative binary operators.
    fn parse_binary(&mut self, min: Precedence, no_in: bool) -> Spanned<Expr> {
        let mut lhs = self.parse_unary();
        // Each operator nests the chain so far one level deeper.
        let mut levels = 0;
        loop {
            let op = match binary_op(self.peek()) {
                Some(BinOp::In) if no_in => break,
                Some(op) => op,
                None => break,
            };
            let prec = op.precedence();
            if prec < min {
                break;
            }
            self.advance(); // consume operator
            if !self.enter_nesting() {
                return error_expr(lhs.span);
            }
            levels += 1;
            let rhs = self.parse_binary(prec.tighter(), no_in);
            let span = self.span_from(lhs.span);
            lhs = Spanned::new(
                Expr::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        self.exit_nesting_levels(levels);
        lhs
    }

    fn parse_unary(&mut self) -> Spanned<Expr> {
        let start = self.current_span();
        let op = match self.peek() {
            Lexeme::Bang => UnaryOp::Not,
            Lexeme::Tilde => UnaryOp::BitNot,
            Lexeme::Plus => UnaryOp::Plus,
            Lexeme::Minus => UnaryOp::Neg,
            Lexeme::Typeof => UnaryOp::Typeof,
            Lexeme::Void => UnaryOp::Void,
            Lexeme::Delete => UnaryOp::Delete,
            Lexeme::PlusPlus | Lexeme::MinusMinus => return self.parse_prefix_update(start),
            _ => return self.parse_postfix(),
        };
        self.advance();
        if !self.enter_nesting() {
            return error_expr(start);
        }
        let arg = self.parse_unary();
        self.exit_nesting();
        Spanned::new(
            Expr::Unary {
                op,
                arg: Box::new(arg),
            },
            self.span_from(start),
        )
    }

    fn parse_prefix_update(&mut self, start: Span) -> Spanned<Expr> {
        let op = if self.at(&Lexeme::PlusPlus) {
            UpdateOp::Increment
        } else {
            UpdateOp::Decrement
        };
        self.advance();
        if !self.enter_nesting() {
            return error_expr(start);
        }
        let arg = self.parse_unary();
        self.exit_nesting();
        if !is_assignable(&arg.node) {
            self.error_with_help(
                &format!("invalid operand for prefix '{}'", op.as_str()),
                "only variables and property accesses can be incremented",
            );
        }
        Spanned::new(
            Expr::Update {
                op,
                prefix: true,
                arg: Box::new(arg),
            },
            self.span_from(start),
        )
    }

    /// Postfix `++`/`--`; a line break before the operator ends the
    /// expression instead.
    fn parse_postfix(&mut self) -> Spanned<Expr> {
        let expr = self.parse_lhs();
        let op = match self.peek() {
            Lexeme::PlusPlus => UpdateOp::Increment,
            Lexeme::MinusMinus => UpdateOp::Decrement,
            _ => return expr,
        };
        if self.newline_before() {
            return expr;
        }
        if !is_assignable(&expr.node) {
            self.error_at_current(&format!("invalid operand for postfix '{}'", op.as_str()));
        }
        self.advance();
        let span = self.span_from(expr.span);
        Spanned::new(
            Expr::Update {
                op,
                prefix: false,
                arg: Box::new(expr),
            },
            span,
        )
    }

    /// Member accesses, calls and `new`.
    fn parse_lhs(&mut self) -> Spanned<Expr> {
        let mut expr = if self.at(&Lexeme::New) {
            self.parse_new()
        } else {
            self.parse_primary()
        };
        let mut levels = 0;
        loop {
            if !matches!(self.peek(), Lexeme::Dot | Lexeme::LBracket | Lexeme::LParen) {
                break;
            }
            if !self.enter_nesting() {
                return error_expr(expr.span);
            }
            levels += 1;
            if self.at(&Lexeme::LParen) {
                let args = self.parse_arguments();
                let span = self.span_from(expr.span);
                expr = Spanned::new(Expr::call(expr, args), span);
            } else {
                expr = self.parse_member(expr);
            }
        }
        self.exit_nesting_levels(levels);
        expr
    }

    /// `new Callee(args)`; the argument list is optional.
    fn parse_new(&mut self) -> Spanned<Expr> {
        let start = self.expect(&Lexeme::New);
        if !self.enter_nesting() {
            return error_expr(start);
        }
        let mut callee = if self.at(&Lexeme::New) {
            self.parse_new()
        } else {
            self.parse_primary()
        };
        let mut levels = 0;
        while matches!(self.peek(), Lexeme::Dot | Lexeme::LBracket) {
            if !self.enter_nesting() {
                return error_expr(start);
            }
            levels += 1;
            callee = self.parse_member(callee);
        }
        self.exit_nesting_levels(levels);
        self.exit_nesting();
        let args = if self.at(&Lexeme::LParen) {
            self.parse_arguments()
        } else {
            Vec::new()
        };
        Spanned::new(
            Expr::New {
                callee: Box::new(callee),
                args,
            },
            self.span_from(start),
        )
    }

    fn parse_member(&mut self, object: Spanned<Expr>) -> Spanned<Expr> {
        let property = if self.eat(&Lexeme::Dot) {
            MemberProp::Ident(self.parse_property_name())
        } else {
            self.expect(&Lexeme::LBracket);
            let index = self.parse_expr(false);
            self.expect(&Lexeme::RBracket);
            MemberProp::Computed(Box::new(index))
        };
        let span = self.span_from(object.span);
        Spanned::new(
            Expr::Member {
                object: Box::new(object),
                property,
            },
            span,
        )
    }

    /// Identifier name after `.`: reserved words are allowed here.
    fn parse_property_name(&mut self) -> Spanned<String> {
        let span = self.current_span();
        let name = match self.peek() {
            Lexeme::Ident(name) => name.clone(),
            other => match other.keyword_text() {
                Some(kw) => kw.to_string(),
                None => return self.expect_ident(),
            },
        };
        self.advance();
        Spanned::new(name, span)
    }

    fn parse_arguments(&mut self) -> Vec<Spanned<Expr>> {
        self.expect(&Lexeme::LParen);
        let mut args = Vec::new();
        while !self.at(&Lexeme::RParen) && !self.at(&Lexeme::Eof) {
            args.push(self.parse_assign(false));
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        self.expect(&Lexeme::RParen);
        args
    }

    fn parse_primary(&mut self) -> Spanned<Expr> {
        let start = self.current_span();
        let literal = |kind: LitKind, raw: &str| Expr::Literal(Literal {
            kind,
            raw: raw.to_string(),
        });

        let expr = match self.peek() {
            Lexeme::This => Expr::This,
            Lexeme::Ident(name) => Expr::Ident(name.clone()),
            Lexeme::Number(raw) => literal(LitKind::Number, raw),
            Lexeme::String(raw) => literal(LitKind::String, raw),
            Lexeme::Regex(raw) => literal(LitKind::Regex, raw),
            Lexeme::Null => literal(LitKind::Null, "null"),
            Lexeme::True => literal(LitKind::Bool, "true"),
            Lexeme::False => literal(LitKind::Bool, "false"),
            Lexeme::LBracket => return self.parse_array(),
            Lexeme::LBrace => return self.parse_object(),
            Lexeme::Function => {
                let func = self.parse_function(false);
                return Spanned::new(Expr::Function(Box::new(func)), self.span_from(start));
            }
            Lexeme::LParen => {
                self.advance();
                let inner = self.parse_expr(false);
                self.expect(&Lexeme::RParen);
                return inner;
            }
            _ => {
                self.error_with_help(
                    &format!("expected expression, found {}", self.peek().description()),
                    "expressions include literals, names, calls, and function literals",
                );
                if !self.at(&Lexeme::Eof) {
                    self.advance();
                }
                return error_expr(start);
            }
        };
        self.advance();
        Spanned::new(expr, start)
    }

    fn parse_array(&mut self) -> Spanned<Expr> {
        let start = self.expect(&Lexeme::LBracket);
        let mut items = Vec::new();
        loop {
            match self.peek() {
                Lexeme::RBracket | Lexeme::Eof => break,
                Lexeme::Comma => {
                    self.advance();
                    items.push(None);
                }
                _ => {
                    items.push(Some(self.parse_assign(false)));
                    if !self.at(&Lexeme::RBracket) {
                        self.expect(&Lexeme::Comma);
                    }
                }
            }
        }
        self.expect(&Lexeme::RBracket);
        Spanned::new(Expr::Array(items), self.span_from(start))
    }

    fn parse_object(&mut self) -> Spanned<Expr> {
        let start = self.expect(&Lexeme::LBrace);
        let mut props = Vec::new();
        while !self.at(&Lexeme::RBrace) && !self.at(&Lexeme::Eof) {
            let before = self.pos;
            props.push(self.parse_property());
            if !self.at(&Lexeme::RBrace) {
                self.expect(&Lexeme::Comma);
            }
            if self.pos == before {
                self.advance();
            }
        }
        self.expect(&Lexeme::RBrace);
        Spanned::new(Expr::Object(props), self.span_from(start))
    }

    fn parse_property(&mut self) -> Property {
        // `get name() {}` / `set name(v) {}`; a plain key named `get` is
        // followed by ':' instead.
        let accessor = match self.peek() {
            Lexeme::Ident(name) if name == "get" => Some(PropKind::Get),
            Lexeme::Ident(name) if name == "set" => Some(PropKind::Set),
            _ => None,
        };
        if let Some(kind) = accessor {
            if !matches!(self.peek_at(1), Lexeme::Colon | Lexeme::Comma | Lexeme::RBrace) {
                self.advance();
                let key = self.parse_property_key();
                let start = self.current_span();
                let params = self.parse_params();
                let body = self.parse_block();
                let func = Function::anonymous(params, body);
                let value = Spanned::new(Expr::Function(Box::new(func)), self.span_from(start));
                return Property { key, kind, value };
            }
        }

        let key = self.parse_property_key();
        self.expect(&Lexeme::Colon);
        let value = self.parse_assign(false);
        Property {
            key,
            kind: PropKind::Init,
            value,
        }
    }

    fn parse_property_key(&mut self) -> Spanned<PropKey> {
        let span = self.current_span();
        let key = match self.peek() {
            Lexeme::String(raw) => PropKey::String(raw.clone()),
            Lexeme::Number(raw) => PropKey::Number(raw.clone()),
            Lexeme::Ident(name) => PropKey::Ident(name.clone()),
            other => match other.keyword_text() {
                Some(kw) => PropKey::Ident(kw.to_string()),
                None => {
                    self.error_at_current(&format!(
                        "expected property name, found {}",
                        self.peek().description()
                    ));
                    return Spanned::new(PropKey::Ident("_error_".to_string()), span);
                }
            },
        };
        self.advance();
        Spanned::new(key, span)
    }

    /// `function name? (params) { body }`. Declarations require the name.
    pub(super) fn parse_function(&mut self, require_name: bool) -> Function {
        self.expect(&Lexeme::Function);
        let id = if matches!(self.peek(), Lexeme::Ident(_)) {
            Some(self.expect_ident())
        } else {
            if require_name {
                self.error_with_help(
                    "function declaration requires a name",
                    "wrap an anonymous function in parentheses to use it as an expression",
                );
            }
            None
        };
        let params = self.parse_params();
        let body = self.parse_block();
        Function { id, params, body }
    }

    fn parse_params(&mut self) -> Vec<Spanned<String>> {
        self.expect(&Lexeme::LParen);
        let mut params = Vec::new();
        while !self.at(&Lexeme::RParen) && !self.at(&Lexeme::Eof) {
            params.push(self.expect_ident());
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        self.expect(&Lexeme::RParen);
        params
    }
}

fn error_expr(span: Span) -> Spanned<Expr> {
    Spanned::new(Expr::Ident("_error_".to_string()), span)
}

fn binary_op(lexeme: &Lexeme) -> Option<BinOp> {
    let op = match lexeme {
        Lexeme::PipePipe => BinOp::Or,
        Lexeme::AmpAmp => BinOp::And,
        Lexeme::Pipe => BinOp::BitOr,
        Lexeme::Caret => BinOp::BitXor,
        Lexeme::Amp => BinOp::BitAnd,
        Lexeme::EqEq => BinOp::Eq,
        Lexeme::NotEq => BinOp::NotEq,
        Lexeme::EqEqEq => BinOp::StrictEq,
        Lexeme::NotEqEq => BinOp::StrictNotEq,
        Lexeme::Lt => BinOp::Lt,
        Lexeme::Gt => BinOp::Gt,
        Lexeme::LtEq => BinOp::LtEq,
        Lexeme::GtEq => BinOp::GtEq,
        Lexeme::In => BinOp::In,
        Lexeme::Instanceof => BinOp::Instanceof,
        Lexeme::Shl => BinOp::Shl,
        Lexeme::Shr => BinOp::Shr,
        Lexeme::UShr => BinOp::UShr,
        Lexeme::Plus => BinOp::Add,
        Lexeme::Minus => BinOp::Sub,
        Lexeme::Star => BinOp::Mul,
        Lexeme::Slash => BinOp::Div,
        Lexeme::Percent => BinOp::Rem,
        _ => return None,
    };
    Some(op)
}

fn assign_op(lexeme: &Lexeme) -> Option<AssignOp> {
    let op = match lexeme {
        Lexeme::Eq => AssignOp::Assign,
        Lexeme::PlusEq => AssignOp::Add,
        Lexeme::MinusEq => AssignOp::Sub,
        Lexeme::StarEq => AssignOp::Mul,
        Lexeme::SlashEq => AssignOp::Div,
        Lexeme::PercentEq => AssignOp::Rem,
        Lexeme::ShlEq => AssignOp::Shl,
        Lexeme::ShrEq => AssignOp::Shr,
        Lexeme::UShrEq => AssignOp::UShr,
        Lexeme::AmpEq => AssignOp::BitAnd,
        Lexeme::PipeEq => AssignOp::BitOr,
        Lexeme::CaretEq => AssignOp::BitXor,
        _ => return None,
    };
    Some(op)
}
