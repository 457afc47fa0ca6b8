use crate::ast::*;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

use super::Parser;

impl Parser {
    pub(super) fn parse_statement(&mut self) -> Spanned<Stmt> {
        let start = self.current_span();
        if !self.enter_nesting() {
            return Spanned::new(Stmt::Empty, start);
        }
        let stmt = self.parse_statement_inner(start);
        self.exit_nesting();
        stmt
    }

    fn parse_statement_inner(&mut self, start: Span) -> Spanned<Stmt> {
        let stmt = match self.peek() {
            Lexeme::LBrace => {
                let block = self.parse_block();
                return block.map(Stmt::Block);
            }
            Lexeme::Var => {
                self.advance();
                let decls = self.parse_var_declarations(false);
                self.consume_semicolon();
                Stmt::Var(decls)
            }
            Lexeme::Semicolon => {
                self.advance();
                Stmt::Empty
            }
            Lexeme::If => self.parse_if(),
            Lexeme::For => self.parse_for(),
            Lexeme::While => {
                self.advance();
                self.expect(&Lexeme::LParen);
                let test = self.parse_expr(false);
                self.expect(&Lexeme::RParen);
                let body = Box::new(self.parse_statement());
                Stmt::While { test, body }
            }
            Lexeme::Do => {
                self.advance();
                let body = Box::new(self.parse_statement());
                self.expect(&Lexeme::While);
                self.expect(&Lexeme::LParen);
                let test = self.parse_expr(false);
                self.expect(&Lexeme::RParen);
                // The semicolon after do-while is always optional.
                self.eat(&Lexeme::Semicolon);
                Stmt::DoWhile { body, test }
            }
            Lexeme::Break | Lexeme::Continue => {
                let is_break = self.at(&Lexeme::Break);
                self.advance();
                let label = self.parse_jump_label();
                self.consume_semicolon();
                if is_break {
                    Stmt::Break(label)
                } else {
                    Stmt::Continue(label)
                }
            }
            Lexeme::Return => {
                self.advance();
                let arg = if self.at(&Lexeme::Semicolon)
                    || self.at(&Lexeme::RBrace)
                    || self.at(&Lexeme::Eof)
                    || self.newline_before()
                {
                    None
                } else {
                    Some(self.parse_expr(false))
                };
                self.consume_semicolon();
                Stmt::Return(arg)
            }
            Lexeme::Throw => {
                self.advance();
                if self.newline_before() {
                    self.error_with_help(
                        "line break after 'throw'",
                        "the thrown expression must start on the same line",
                    );
                }
                let arg = self.parse_expr(false);
                self.consume_semicolon();
                Stmt::Throw(arg)
            }
            Lexeme::Try => self.parse_try(),
            Lexeme::Switch => self.parse_switch(),
            Lexeme::Function => {
                let func = self.parse_function(true);
                Stmt::Function(func)
            }
            Lexeme::Debugger => {
                self.advance();
                self.consume_semicolon();
                Stmt::Debugger
            }
            Lexeme::With => {
                self.error_with_help(
                    "'with' statements are not supported",
                    "rewrite the body with explicit property accesses",
                );
                self.advance();
                Stmt::Empty
            }
            Lexeme::Ident(_) if matches!(self.peek_at(1), Lexeme::Colon) => {
                let label = self.expect_ident();
                self.advance(); // consume ':'
                let body = Box::new(self.parse_statement());
                Stmt::Labeled { label, body }
            }
            _ => {
                let expr = self.parse_expr(false);
                self.consume_semicolon();
                Stmt::Expr(expr)
            }
        };
        Spanned::new(stmt, self.span_from(start))
    }

    /// `{ stmts }`, spanning both braces.
    pub(super) fn parse_block(&mut self) -> Spanned<Block> {
        let start = self.expect(&Lexeme::LBrace);
        let stmts = self.parse_statements_until_brace();
        self.expect(&Lexeme::RBrace);
        Spanned::new(Block { stmts }, self.span_from(start))
    }

    fn parse_statements_until_brace(&mut self) -> Vec<Spanned<Stmt>> {
        let mut stmts = Vec::new();
        while !self.at(&Lexeme::RBrace) && !self.at(&Lexeme::Eof) {
            let before = self.pos;
            stmts.push(self.parse_statement());
            if self.pos == before {
                self.advance();
            }
        }
        stmts
    }

    fn parse_jump_label(&mut self) -> Option<Spanned<String>> {
        if matches!(self.peek(), Lexeme::Ident(_)) && !self.newline_before() {
            Some(self.expect_ident())
        } else {
            None
        }
    }

    pub(super) fn parse_var_declarations(&mut self, no_in: bool) -> Vec<VarDeclarator> {
        let mut decls = Vec::new();
        loop {
            let name = self.expect_ident();
            let init = if self.eat(&Lexeme::Eq) {
                Some(self.parse_assign(no_in))
            } else {
                None
            };
            decls.push(VarDeclarator { name, init });
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        decls
    }

    fn parse_if(&mut self) -> Stmt {
        self.expect(&Lexeme::If);
        self.expect(&Lexeme::LParen);
        let test = self.parse_expr(false);
        self.expect(&Lexeme::RParen);
        let consequent = Box::new(self.parse_statement());
        let alternate = if self.eat(&Lexeme::Else) {
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };
        Stmt::If {
            test,
            consequent,
            alternate,
        }
    }

    /// `for (init; test; update)` and both forms of `for (x in obj)`.
    fn parse_for(&mut self) -> Stmt {
        self.expect(&Lexeme::For);
        self.expect(&Lexeme::LParen);

        let init = if self.at(&Lexeme::Semicolon) {
            None
        } else if self.eat(&Lexeme::Var) {
            let mut decls = self.parse_var_declarations(true);
            if decls.len() == 1 && self.eat(&Lexeme::In) {
                let decl = decls.remove(0);
                return self.finish_for_in(ForInTarget::Var(decl));
            }
            Some(ForInit::Var(decls))
        } else {
            let expr = self.parse_expr(true);
            if self.at(&Lexeme::In) {
                if !is_assignable(&expr.node) {
                    self.error_at_current("invalid left-hand side in for-in loop");
                }
                self.advance();
                return self.finish_for_in(ForInTarget::Expr(expr));
            }
            Some(ForInit::Expr(expr))
        };

        self.expect(&Lexeme::Semicolon);
        let test = if self.at(&Lexeme::Semicolon) {
            None
        } else {
            Some(self.parse_expr(false))
        };
        self.expect(&Lexeme::Semicolon);
        let update = if self.at(&Lexeme::RParen) {
            None
        } else {
            Some(self.parse_expr(false))
        };
        self.expect(&Lexeme::RParen);
        let body = Box::new(self.parse_statement());
        Stmt::For {
            init,
            test,
            update,
            body,
        }
    }

    fn finish_for_in(&mut self, left: ForInTarget) -> Stmt {
        let right = self.parse_expr(false);
        self.expect(&Lexeme::RParen);
        let body = Box::new(self.parse_statement());
        Stmt::ForIn { left, right, body }
    }

    fn parse_try(&mut self) -> Stmt {
        self.expect(&Lexeme::Try);
        let block = self.parse_block();

        let handler = if self.eat(&Lexeme::Catch) {
            self.expect(&Lexeme::LParen);
            let param = self.expect_ident();
            self.expect(&Lexeme::RParen);
            let body = self.parse_block();
            Some(CatchClause { param, body })
        } else {
            None
        };
        let finalizer = if self.eat(&Lexeme::Finally) {
            Some(self.parse_block())
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            self.error_with_help(
                "'try' without 'catch' or 'finally'",
                "add a `catch (e) { ... }` or `finally { ... }` clause",
            );
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
        }
    }

    fn parse_switch(&mut self) -> Stmt {
        self.expect(&Lexeme::Switch);
        self.expect(&Lexeme::LParen);
        let discriminant = self.parse_expr(false);
        self.expect(&Lexeme::RParen);
        self.expect(&Lexeme::LBrace);

        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.at(&Lexeme::RBrace) && !self.at(&Lexeme::Eof) {
            let start = self.current_span();
            let test = if self.eat(&Lexeme::Case) {
                Some(self.parse_expr(false))
            } else if self.at(&Lexeme::Default) {
                if seen_default {
                    self.error_at_current("more than one 'default' clause in switch");
                }
                seen_default = true;
                self.advance();
                None
            } else {
                self.error_at_current(&format!(
                    "expected 'case' or 'default', found {}",
                    self.peek().description()
                ));
                self.advance();
                continue;
            };
            self.expect(&Lexeme::Colon);

            let mut body = Vec::new();
            while !matches!(
                self.peek(),
                Lexeme::Case | Lexeme::Default | Lexeme::RBrace | Lexeme::Eof
            ) {
                let before = self.pos;
                body.push(self.parse_statement());
                if self.pos == before {
                    self.advance();
                }
            }
            cases.push(Spanned::new(SwitchCase { test, body }, self.span_from(start)));
        }
        self.expect(&Lexeme::RBrace);
        Stmt::Switch {
            discriminant,
            cases,
        }
    }
}

/// Whether an expression may appear on the left of `=`, `++` or `in`.
pub(super) fn is_assignable(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(_) | Expr::Member { .. })
}
