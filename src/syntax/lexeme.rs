use crate::span::Span;

/// All lexemes of ECMAScript 5.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    // Keywords
    Break,
    Case,
    Catch,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Finally,
    For,
    Function,
    If,
    In,
    Instanceof,
    New,
    Return,
    Switch,
    This,
    Throw,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,

    // Keyword literals
    Null,
    True,
    False,

    // Punctuators
    LBrace,     // {
    RBrace,     // }
    LParen,     // (
    RParen,     // )
    LBracket,   // [
    RBracket,   // ]
    Dot,        // .
    Semicolon,  // ;
    Comma,      // ,
    Question,   // ?
    Colon,      // :
    Lt,         // <
    Gt,         // >
    LtEq,       // <=
    GtEq,       // >=
    EqEq,       // ==
    NotEq,      // !=
    EqEqEq,     // ===
    NotEqEq,    // !==
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    PlusPlus,   // ++
    MinusMinus, // --
    Shl,        // <<
    Shr,        // >>
    UShr,       // >>>
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    Bang,       // !
    Tilde,      // ~
    AmpAmp,     // &&
    PipePipe,   // ||
    Eq,         // =
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    ShlEq,      // <<=
    ShrEq,      // >>=
    UShrEq,     // >>>=
    AmpEq,      // &=
    PipeEq,     // |=
    CaretEq,    // ^=

    // Literals, kept as raw source text
    Number(String),
    String(String),
    Regex(String),
    Ident(String),

    // End of file
    Eof,
}

impl Lexeme {
    /// Try to match an identifier string to a keyword lexeme.
    pub fn from_keyword(s: &str) -> Option<Lexeme> {
        match s {
            "break" => Some(Lexeme::Break),
            "case" => Some(Lexeme::Case),
            "catch" => Some(Lexeme::Catch),
            "continue" => Some(Lexeme::Continue),
            "debugger" => Some(Lexeme::Debugger),
            "default" => Some(Lexeme::Default),
            "delete" => Some(Lexeme::Delete),
            "do" => Some(Lexeme::Do),
            "else" => Some(Lexeme::Else),
            "finally" => Some(Lexeme::Finally),
            "for" => Some(Lexeme::For),
            "function" => Some(Lexeme::Function),
            "if" => Some(Lexeme::If),
            "in" => Some(Lexeme::In),
            "instanceof" => Some(Lexeme::Instanceof),
            "new" => Some(Lexeme::New),
            "return" => Some(Lexeme::Return),
            "switch" => Some(Lexeme::Switch),
            "this" => Some(Lexeme::This),
            "throw" => Some(Lexeme::Throw),
            "try" => Some(Lexeme::Try),
            "typeof" => Some(Lexeme::Typeof),
            "var" => Some(Lexeme::Var),
            "void" => Some(Lexeme::Void),
            "while" => Some(Lexeme::While),
            "with" => Some(Lexeme::With),
            "null" => Some(Lexeme::Null),
            "true" => Some(Lexeme::True),
            "false" => Some(Lexeme::False),
            _ => None,
        }
    }

    /// Source text of a keyword lexeme, for positions where ES5 accepts any
    /// identifier name (`promise.catch`, `{ default: 1 }`).
    pub fn keyword_text(&self) -> Option<&'static str> {
        let text = match self {
            Lexeme::Break => "break",
            Lexeme::Case => "case",
            Lexeme::Catch => "catch",
            Lexeme::Continue => "continue",
            Lexeme::Debugger => "debugger",
            Lexeme::Default => "default",
            Lexeme::Delete => "delete",
            Lexeme::Do => "do",
            Lexeme::Else => "else",
            Lexeme::Finally => "finally",
            Lexeme::For => "for",
            Lexeme::Function => "function",
            Lexeme::If => "if",
            Lexeme::In => "in",
            Lexeme::Instanceof => "instanceof",
            Lexeme::New => "new",
            Lexeme::Return => "return",
            Lexeme::Switch => "switch",
            Lexeme::This => "this",
            Lexeme::Throw => "throw",
            Lexeme::Try => "try",
            Lexeme::Typeof => "typeof",
            Lexeme::Var => "var",
            Lexeme::Void => "void",
            Lexeme::While => "while",
            Lexeme::With => "with",
            Lexeme::Null => "null",
            Lexeme::True => "true",
            Lexeme::False => "false",
            _ => return None,
        };
        Some(text)
    }

    /// Whether a `/` following this lexeme starts a regular expression
    /// literal rather than a division operator.
    pub fn allows_regex_after(&self) -> bool {
        match self {
            Lexeme::Ident(_)
            | Lexeme::Number(_)
            | Lexeme::String(_)
            | Lexeme::Regex(_)
            | Lexeme::This
            | Lexeme::Null
            | Lexeme::True
            | Lexeme::False
            | Lexeme::RParen
            | Lexeme::RBracket
            | Lexeme::PlusPlus
            | Lexeme::MinusMinus => false,
            _ => true,
        }
    }

    pub fn description(&self) -> String {
        if let Some(kw) = self.keyword_text() {
            return format!("'{}'", kw);
        }
        let sym = match self {
            Lexeme::LBrace => "'{'",
            Lexeme::RBrace => "'}'",
            Lexeme::LParen => "'('",
            Lexeme::RParen => "')'",
            Lexeme::LBracket => "'['",
            Lexeme::RBracket => "']'",
            Lexeme::Dot => "'.'",
            Lexeme::Semicolon => "';'",
            Lexeme::Comma => "','",
            Lexeme::Question => "'?'",
            Lexeme::Colon => "':'",
            Lexeme::Lt => "'<'",
            Lexeme::Gt => "'>'",
            Lexeme::LtEq => "'<='",
            Lexeme::GtEq => "'>='",
            Lexeme::EqEq => "'=='",
            Lexeme::NotEq => "'!='",
            Lexeme::EqEqEq => "'==='",
            Lexeme::NotEqEq => "'!=='",
            Lexeme::Plus => "'+'",
            Lexeme::Minus => "'-'",
            Lexeme::Star => "'*'",
            Lexeme::Slash => "'/'",
            Lexeme::Percent => "'%'",
            Lexeme::PlusPlus => "'++'",
            Lexeme::MinusMinus => "'--'",
            Lexeme::Shl => "'<<'",
            Lexeme::Shr => "'>>'",
            Lexeme::UShr => "'>>>'",
            Lexeme::Amp => "'&'",
            Lexeme::Pipe => "'|'",
            Lexeme::Caret => "'^'",
            Lexeme::Bang => "'!'",
            Lexeme::Tilde => "'~'",
            Lexeme::AmpAmp => "'&&'",
            Lexeme::PipePipe => "'||'",
            Lexeme::Eq => "'='",
            Lexeme::PlusEq => "'+='",
            Lexeme::MinusEq => "'-='",
            Lexeme::StarEq => "'*='",
            Lexeme::SlashEq => "'/='",
            Lexeme::PercentEq => "'%='",
            Lexeme::ShlEq => "'<<='",
            Lexeme::ShrEq => "'>>='",
            Lexeme::UShrEq => "'>>>='",
            Lexeme::AmpEq => "'&='",
            Lexeme::PipeEq => "'|='",
            Lexeme::CaretEq => "'^='",
            Lexeme::Number(_) => "number literal",
            Lexeme::String(_) => "string literal",
            Lexeme::Regex(_) => "regular expression",
            Lexeme::Ident(_) => "identifier",
            Lexeme::Eof => "end of file",
            _ => "token",
        };
        sym.to_string()
    }
}

/// A lexeme with its span and the line-terminator information needed for
/// automatic semicolon insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub lexeme: Lexeme,
    pub span: Span,
    /// A line terminator appeared between the previous token and this one.
    pub newline_before: bool,
}
