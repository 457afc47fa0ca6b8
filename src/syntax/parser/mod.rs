mod expr;
mod stmt;

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::lexeme::{Lexeme, Token};
use crate::span::{Span, Spanned};

pub const MAX_NESTING_DEPTH: u32 = 256;

/// Recursive-descent parser for ECMAScript 5, with automatic semicolon
/// insertion. Errors are collected; the program is only returned when
/// there are none.
pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
    max_depth: u32,
}

impl Parser {
    pub(crate) fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.lexeme) != Some(&Lexeme::Eof) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token {
                lexeme: Lexeme::Eof,
                span: Span::new(end, end),
                newline_before: false,
            });
        }
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    pub(crate) fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn parse_program(mut self) -> Result<Program, Vec<Diagnostic>> {
        let mut body = Vec::new();
        while !self.at(&Lexeme::Eof) {
            let before = self.pos;
            body.push(self.parse_statement());
            if self.pos == before {
                // No progress: skip the offending token.
                self.advance();
            }
        }
        let end = self.current_span().end;

        if !self.diagnostics.is_empty() {
            return Err(self.diagnostics);
        }
        Ok(Program {
            body,
            span: Span::new(0, end),
        })
    }

    fn enter_nesting(&mut self) -> bool {
        self.depth += 1;
        if self.depth > self.max_depth {
            let msg = format!("nesting depth exceeded (maximum {} levels)", self.max_depth);
            self.error_with_help(
                &msg,
                "move deeply nested code into separate functions",
            );
            // Unwind everything: the rest of the input is not parsed.
            self.pos = self.tokens.len() - 1;
            return false;
        }
        true
    }

    fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    /// Leave the levels a loop entered while building a left-nested chain.
    fn exit_nesting_levels(&mut self, levels: u32) {
        self.depth -= levels;
    }

    // --- Token helpers ---

    fn peek(&self) -> &Lexeme {
        &self.tokens[self.pos].lexeme
    }

    fn peek_at(&self, offset: usize) -> &Lexeme {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].lexeme
    }

    fn newline_before(&self) -> bool {
        self.tokens[self.pos].newline_before
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        Span::new(start.start, self.prev_span().end.max(start.start))
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, token: &Lexeme) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn eat(&mut self, token: &Lexeme) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Lexeme) -> Span {
        if self.at(token) {
            let span = self.current_span();
            self.advance();
            span
        } else {
            self.error_at_current(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            ));
            self.current_span()
        }
    }

    fn expect_ident(&mut self) -> Spanned<String> {
        if let Lexeme::Ident(name) = self.peek().clone() {
            let span = self.current_span();
            self.advance();
            Spanned::new(name, span)
        } else {
            let found = self.peek();
            let msg = format!("expected identifier, found {}", found.description());
            if found.keyword_text().is_some() {
                self.error_with_help(&msg, "reserved words cannot be used as names");
            } else {
                self.error_at_current(&msg);
            }
            Spanned::new("_error_".to_string(), self.current_span())
        }
    }

    /// Statement terminator with automatic semicolon insertion: an explicit
    /// `;`, or a line break, `}` or end of input before the next token.
    fn consume_semicolon(&mut self) {
        if self.eat(&Lexeme::Semicolon) {
            return;
        }
        if self.at(&Lexeme::RBrace) || self.at(&Lexeme::Eof) || self.newline_before() {
            return;
        }
        self.error_at_current(&format!(
            "expected ';', found {}",
            self.peek().description()
        ));
    }

    fn error_at_current(&mut self, msg: &str) {
        self.diagnostics
            .push(Diagnostic::error(msg.to_string(), self.current_span()));
    }

    fn error_with_help(&mut self, msg: &str, help: &str) {
        self.diagnostics.push(
            Diagnostic::error(msg.to_string(), self.current_span()).with_help(help.to_string()),
        );
    }
}

#[cfg(test)]
mod tests;
