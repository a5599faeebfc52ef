use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("fn", TokenKind::Fn);
        map.insert("while", TokenKind::While);
        map.insert("loop", TokenKind::Loop);
        map.insert("match", TokenKind::Match);
        map.insert("break", TokenKind::Break);
        map.insert("next", TokenKind::Next);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("not", TokenKind::Not);
        map.insert("int", TokenKind::Int);
        map.insert("float", TokenKind::Float);
        map.insert("bool", TokenKind::Bool);
        map.insert("string", TokenKind::String);
        map.insert("true", TokenKind::LitBool);
        map.insert("false", TokenKind::LitBool);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Eof,
    Id,

    // literals
    LitInt,
    LitFloat,
    LitString,
    LitBool,

    // structural
    LPar,
    RPar,
    LBrace,
    RBrace,
    Semi,
    Colon,
    Comma,
    Arrow,

    // operators
    Div,
    Plus,
    Minus,
    Mod,
    Mult,
    Assign,
    Eq,
    Greater,
    Less,
    GreaterEq,
    LessEq,

    // keywords
    If,
    Else,
    Fn,
    While,
    Loop,
    Match,
    Next,
    Break,
    And,
    Or,
    Not,
    Int,
    Float,
    Bool,
    String,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub fn is_literal(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LitInt | TokenKind::LitFloat | TokenKind::LitString | TokenKind::LitBool
    )
}

pub fn is_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Int | TokenKind::Float | TokenKind::Bool | TokenKind::String
    )
}

pub fn is_binary_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Eq
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Mult
            | TokenKind::Div
            | TokenKind::Mod
            | TokenKind::Greater
            | TokenKind::Less
            | TokenKind::GreaterEq
            | TokenKind::LessEq
            | TokenKind::And
            | TokenKind::Or
    )
}

/// Precedence rank of an operator. Lower ranks bind tighter.
pub fn precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Mult | TokenKind::Div => Some(0),
        TokenKind::Plus | TokenKind::Minus => Some(1),
        TokenKind::Mod => Some(2),
        TokenKind::Not => Some(3),
        TokenKind::And | TokenKind::Or => Some(4),
        TokenKind::Greater
        | TokenKind::GreaterEq
        | TokenKind::Eq
        | TokenKind::Less
        | TokenKind::LessEq => Some(5),
        _ => None,
    }
}

/// Tokens that end a pending expression on the parse stack.
pub fn is_expr_terminator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Colon | TokenKind::Comma | TokenKind::Semi | TokenKind::RPar
    )
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.text)
    }
}

impl Token {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    pub fn debug(&self) {
        println!(
            "{} @{},{}, len: {}, ||{}||",
            self.kind,
            self.line,
            self.column,
            self.len(),
            self.text
        );
    }
}
