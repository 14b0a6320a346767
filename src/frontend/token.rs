//! Token definitions for Mini

use std::fmt;

use crate::utils::Span;

/// Index of a token in [`crate::frontend::ast::Ast::tokens`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub u32);

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(span: Span) -> Self {
        Self { kind: TokenKind::Eof, span }
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ============ Keywords ============
    /// fn
    Fn,
    /// const
    Const,
    /// var
    Var,
    /// return
    Return,
    /// if
    If,
    /// true
    True,
    /// false
    False,

    // ============ Identifiers and Literals ============
    /// Identifier (variable name, function name, type name)
    Ident(String),
    /// Integer literal, unsigned; range is checked by the parser
    IntLit(u64),

    // ============ Operators ============
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// =
    Eq,

    // ============ Delimiters ============
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// ,
    Comma,
    /// :
    Colon,
    /// ;
    Semicolon,

    // ============ Special ============
    /// End of file
    Eof,
    /// Unknown/invalid character
    Unknown(char),
}

impl TokenKind {
    /// Try to convert an identifier to a keyword
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "fn" => Some(TokenKind::Fn),
            "const" => Some(TokenKind::Const),
            "var" => Some(TokenKind::Var),
            "return" => Some(TokenKind::Return),
            "if" => Some(TokenKind::If),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            _ => None,
        }
    }

    /// Get the precedence of a binary operator (for Pratt parsing)
    /// Returns None if not a binary operator
    pub fn binary_precedence(&self) -> Option<u8> {
        match self {
            // Additive
            TokenKind::Plus | TokenKind::Minus => Some(10),

            // Multiplicative
            TokenKind::Star | TokenKind::Slash => Some(11),

            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Fn => write!(f, "'fn'"),
            TokenKind::Const => write!(f, "'const'"),
            TokenKind::Var => write!(f, "'var'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::True => write!(f, "'true'"),
            TokenKind::False => write!(f, "'false'"),
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::IntLit(n) => write!(f, "integer {}", n),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Eof => write!(f, "end of file"),
            TokenKind::Unknown(c) => write!(f, "'{}'", c),
        }
    }
}
