pub mod api;
pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod syntax;
pub mod transform;

// Re-exports: the syntax collaborators keep short `crate::X` paths
pub use syntax::format;
pub use syntax::lexeme;
pub use syntax::lexer;
pub use syntax::parser;
pub use syntax::span;

// Re-export public API: `promise_me::convert()` etc.
pub use api::*;

use config::ParseOptions;
use diagnostic::Diagnostic;
use lexer::{Comment, Lexer};
use parser::Parser;

/// Parse ES5 source into a program and the comments found in it.
///
/// Lexer errors are returned before parsing is attempted.
pub fn parse_source(
    source: &str,
    options: &ParseOptions,
) -> Result<(ast::Program, Vec<Comment>), Vec<Diagnostic>> {
    let lexer = Lexer::new(source);
    let lexer = if options.comments {
        lexer
    } else {
        lexer.without_comments()
    };
    let (tokens, comments, lex_errors) = lexer.tokenize();
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }

    let program = Parser::new(tokens)
        .with_max_depth(options.max_depth)
        .parse_program()?;
    Ok((program, comments))
}
