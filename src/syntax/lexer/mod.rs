use crate::diagnostic::Diagnostic;
use crate::lexeme::{Lexeme, Token};
use crate::span::Span;

/// A source comment preserved for the printer.
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub text: String, // includes the "//" or "/*" delimiters
    pub span: Span,
    /// A token appeared earlier on the same line.
    pub trailing: bool,
    /// End offset of the token before the comment.
    pub prev_end: u32,
}

pub(crate) struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    comments: Vec<Comment>,
    keep_comments: bool,
    /// Whether we've seen a token on the current line.
    token_on_line: bool,
    /// Whether a line terminator was skipped since the last token.
    newline_before: bool,
    prev_end: u32,
    regex_allowed: bool,
}

impl<'src> Lexer<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            diagnostics: Vec::new(),
            comments: Vec::new(),
            keep_comments: true,
            token_on_line: false,
            newline_before: false,
            prev_end: 0,
            regex_allowed: true,
        }
    }

    /// Drop comments instead of collecting them.
    pub(crate) fn without_comments(mut self) -> Self {
        self.keep_comments = false;
        self
    }

    pub(crate) fn tokenize(mut self) -> (Vec<Token>, Vec<Comment>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        // A leading byte order mark is not part of the program.
        if self.source.starts_with(&[0xEF, 0xBB, 0xBF]) {
            self.pos = 3;
        }
        loop {
            let tok = self.next_token();
            let is_eof = tok.lexeme == Lexeme::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, self.comments, self.diagnostics)
    }

    fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();

            if self.pos >= self.source.len() {
                return self.make_token(Lexeme::Eof, self.pos, self.pos);
            }

            let start = self.pos;
            let ch = self.source[self.pos];

            if is_ident_start(ch) {
                return self.scan_ident_or_keyword();
            }

            if ch.is_ascii_digit() || (ch == b'.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())) {
                return self.scan_number();
            }

            if ch == b'"' || ch == b'\'' {
                if let Some(tok) = self.scan_string(ch) {
                    return tok;
                }
                continue;
            }

            if ch == b'/' && self.regex_allowed {
                if let Some(tok) = self.scan_regex() {
                    return tok;
                }
                continue;
            }

            if let Some(tok) = self.scan_symbol(start) {
                return tok;
            }
            // scan_symbol returned None → error was recorded, try again
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.source.len() {
                match self.source[self.pos] {
                    b'\n' | b'\r' => {
                        self.token_on_line = false;
                        self.newline_before = true;
                        self.pos += 1;
                    }
                    b' ' | b'\t' | 0x0B | 0x0C => self.pos += 1,
                    // U+00A0 NO-BREAK SPACE
                    0xC2 if self.peek_at(1) == Some(0xA0) => self.pos += 2,
                    // U+FEFF ZERO WIDTH NO-BREAK SPACE
                    0xEF if self.peek_at(1) == Some(0xBB) && self.peek_at(2) == Some(0xBF) => {
                        self.pos += 3
                    }
                    // U+2028 / U+2029 line and paragraph separators
                    0xE2 if self.peek_at(1) == Some(0x80)
                        && matches!(self.peek_at(2), Some(0xA8) | Some(0xA9)) =>
                    {
                        self.token_on_line = false;
                        self.newline_before = true;
                        self.pos += 3;
                    }
                    _ => break,
                }
            }

            if self.starts_with(b"//") {
                let start = self.pos;
                while self.pos < self.source.len()
                    && self.source[self.pos] != b'\n'
                    && self.source[self.pos] != b'\r'
                {
                    self.pos += 1;
                }
                self.push_comment(start);
                continue;
            }

            if self.starts_with(b"/*") {
                let start = self.pos;
                self.pos += 2;
                let mut closed = false;
                let mut multiline = false;
                while self.pos < self.source.len() {
                    if self.starts_with(b"*/") {
                        self.pos += 2;
                        closed = true;
                        break;
                    }
                    if self.source[self.pos] == b'\n' || self.source[self.pos] == b'\r' {
                        multiline = true;
                    }
                    self.pos += 1;
                }
                if !closed {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "unterminated block comment".to_string(),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_help("close the comment with `*/`".to_string()),
                    );
                }
                self.push_comment(start);
                if multiline {
                    self.token_on_line = false;
                    self.newline_before = true;
                }
                continue;
            }

            break;
        }
    }

    fn push_comment(&mut self, start: usize) {
        if !self.keep_comments {
            return;
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        self.comments.push(Comment {
            text,
            span: Span::new(start as u32, self.pos as u32),
            trailing: self.token_on_line,
            prev_end: self.prev_end,
        });
    }

    fn scan_ident_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        let token = Lexeme::from_keyword(&text).unwrap_or(Lexeme::Ident(text));
        self.make_token(token, start, self.pos)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        if self.starts_with(b"0x") || self.starts_with(b"0X") {
            self.pos += 2;
            let digits_start = self.pos;
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_hexdigit() {
                self.pos += 1;
            }
            if self.pos == digits_start {
                self.diagnostics.push(Diagnostic::error(
                    "hexadecimal literal has no digits".to_string(),
                    Span::new(start as u32, self.pos as u32),
                ));
            }
        } else {
            self.skip_digits();
            if self.peek_at(0) == Some(b'.') {
                self.pos += 1;
                self.skip_digits();
            }
            if matches!(self.peek_at(0), Some(b'e') | Some(b'E')) {
                self.pos += 1;
                if matches!(self.peek_at(0), Some(b'+') | Some(b'-')) {
                    self.pos += 1;
                }
                let exp_start = self.pos;
                self.skip_digits();
                if self.pos == exp_start {
                    self.diagnostics.push(Diagnostic::error(
                        "exponent has no digits".to_string(),
                        Span::new(start as u32, self.pos as u32),
                    ));
                }
            }
        }
        if self.peek_at(0).is_some_and(is_ident_start) {
            self.diagnostics.push(
                Diagnostic::error(
                    "identifier starts immediately after numeric literal".to_string(),
                    Span::new(start as u32, self.pos as u32 + 1),
                )
                .with_help("separate the number and the name with whitespace or an operator".to_string()),
            );
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        self.make_token(Lexeme::Number(text), start, self.pos)
    }

    fn skip_digits(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self, quote: u8) -> Option<Token> {
        let start = self.pos;
        self.pos += 1; // opening quote
        loop {
            match self.peek_at(0) {
                None | Some(b'\n') | Some(b'\r') => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "unterminated string literal".to_string(),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_help(format!(
                            "close the string with a matching {}",
                            quote as char
                        )),
                    );
                    return None;
                }
                Some(b'\\') => {
                    // Escapes, including `\` line continuations.
                    self.pos = (self.pos + 2).min(self.source.len());
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        Some(self.make_token(Lexeme::String(text), start, self.pos))
    }

    fn scan_regex(&mut self) -> Option<Token> {
        let start = self.pos;
        self.pos += 1; // opening slash
        let mut in_class = false;
        loop {
            match self.peek_at(0) {
                None | Some(b'\n') | Some(b'\r') => {
                    self.diagnostics.push(Diagnostic::error(
                        "unterminated regular expression".to_string(),
                        Span::new(start as u32, self.pos as u32),
                    ));
                    return None;
                }
                Some(b'\\') => self.pos = (self.pos + 2).min(self.source.len()),
                Some(b'[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(b']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some(b'/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        Some(self.make_token(Lexeme::Regex(text), start, self.pos))
    }

    fn scan_symbol(&mut self, start: usize) -> Option<Token> {
        // Longest match first.
        const SYMBOLS: &[(&str, Lexeme)] = &[
            (">>>=", Lexeme::UShrEq),
            ("===", Lexeme::EqEqEq),
            ("!==", Lexeme::NotEqEq),
            (">>>", Lexeme::UShr),
            ("<<=", Lexeme::ShlEq),
            (">>=", Lexeme::ShrEq),
            ("<=", Lexeme::LtEq),
            (">=", Lexeme::GtEq),
            ("==", Lexeme::EqEq),
            ("!=", Lexeme::NotEq),
            ("++", Lexeme::PlusPlus),
            ("--", Lexeme::MinusMinus),
            ("<<", Lexeme::Shl),
            (">>", Lexeme::Shr),
            ("&&", Lexeme::AmpAmp),
            ("||", Lexeme::PipePipe),
            ("+=", Lexeme::PlusEq),
            ("-=", Lexeme::MinusEq),
            ("*=", Lexeme::StarEq),
            ("/=", Lexeme::SlashEq),
            ("%=", Lexeme::PercentEq),
            ("&=", Lexeme::AmpEq),
            ("|=", Lexeme::PipeEq),
            ("^=", Lexeme::CaretEq),
            ("{", Lexeme::LBrace),
            ("}", Lexeme::RBrace),
            ("(", Lexeme::LParen),
            (")", Lexeme::RParen),
            ("[", Lexeme::LBracket),
            ("]", Lexeme::RBracket),
            (".", Lexeme::Dot),
            (";", Lexeme::Semicolon),
            (",", Lexeme::Comma),
            ("?", Lexeme::Question),
            (":", Lexeme::Colon),
            ("<", Lexeme::Lt),
            (">", Lexeme::Gt),
            ("+", Lexeme::Plus),
            ("-", Lexeme::Minus),
            ("*", Lexeme::Star),
            ("/", Lexeme::Slash),
            ("%", Lexeme::Percent),
            ("&", Lexeme::Amp),
            ("|", Lexeme::Pipe),
            ("^", Lexeme::Caret),
            ("!", Lexeme::Bang),
            ("~", Lexeme::Tilde),
            ("=", Lexeme::Eq),
        ];

        if self.starts_with(b"=>") {
            self.pos += 2;
            self.diagnostics.push(
                Diagnostic::error(
                    "arrow functions are not supported".to_string(),
                    Span::new(start as u32, self.pos as u32),
                )
                .with_help("only ECMAScript 5 input is accepted; use `function (...) { ... }`".to_string()),
            );
            return None;
        }

        for (text, lexeme) in SYMBOLS {
            if self.starts_with(text.as_bytes()) {
                self.pos += text.len();
                return Some(self.make_token(lexeme.clone(), start, self.pos));
            }
        }

        let ch = self.source[self.pos];
        // Skip the whole UTF-8 sequence so the error points at one character.
        let width = utf8_width(ch);
        self.pos = (self.pos + width).min(self.source.len());
        let shown = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        let mut diag = Diagnostic::error(
            format!("unexpected character '{}'", shown),
            Span::new(start as u32, self.pos as u32),
        );
        if ch == b'`' {
            diag = diag.with_help("template literals are not supported in ECMAScript 5 input".to_string());
        }
        self.diagnostics.push(diag);
        None
    }

    fn starts_with(&self, text: &[u8]) -> bool {
        self.source
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(text))
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn make_token(&mut self, lexeme: Lexeme, start: usize, end: usize) -> Token {
        self.regex_allowed = lexeme.allows_regex_after();
        self.token_on_line = true;
        self.prev_end = end as u32;
        let newline_before = std::mem::take(&mut self.newline_before);
        Token {
            lexeme,
            span: Span::new(start as u32, end as u32),
            newline_before,
        }
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch == b'$' || (ch >= 0x80 && !is_utf8_space_lead(ch))
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$' || (ch >= 0x80 && !is_utf8_space_lead(ch))
}

/// Lead bytes of the non-ASCII whitespace sequences handled by the lexer.
/// Identifier characters sharing these lead bytes are rare enough to ignore.
fn is_utf8_space_lead(ch: u8) -> bool {
    matches!(ch, 0xC2 | 0xE2 | 0xEF)
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0xF0..=0xFF => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}
