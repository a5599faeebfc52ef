//! Utility macros for the compiler.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed-text tokens

/// Creates a Token instance at the given line/column.
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $text:expr, $line:expr, $column:expr) => {
        Token {
            kind: $kind,
            text: $text,
            line: $line,
            column: $column,
        }
    };
}

/// Creates a lexer handler for a token whose text is always the same,
/// like `(`, `;` or `->`. The generated handler pushes the token and
/// advances the lexer position past it.
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $text:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let token = MK_TOKEN!($kind, String::from($text), lexer.line(), lexer.column());
            lexer.push(token);
            lexer.advance_str($text);
            Ok(())
        }
    };
}
