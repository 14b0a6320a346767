//! Lexer for Mini
//!
//! Converts source code into a stream of tokens, each tagged with the
//! line and column it starts at.

use crate::frontend::token::{Token, TokenKind};
use crate::utils::Span;

/// The lexer state
pub struct Lexer {
    /// Source code as chars
    source: Vec<char>,
    /// Current position in source (char index)
    pos: usize,
    /// Byte offset of `pos`
    byte_pos: usize,
    /// Line of `pos`
    line: u32,
    /// Column of `pos`
    column: u32,
    /// Start of the current token
    start: usize,
    start_byte: usize,
    start_line: u32,
    start_column: u32,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            byte_pos: 0,
            line: 1,
            column: 1,
            start: 0,
            start_byte: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    /// Get the next character without advancing
    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    /// Advance to the next character
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        self.byte_pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn mark_start(&mut self) {
        self.start = self.pos;
        self.start_byte = self.byte_pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    /// Create a span from start to current position
    fn make_span(&self) -> Span {
        Span::new(self.start_byte, self.byte_pos, self.start_line, self.start_column)
    }

    /// Create a token with the current span
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Skip whitespace and comments
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                // Line comment
                '/' if self.peek_next() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.source[self.start..self.pos].iter().collect();

        let kind = TokenKind::keyword_from_str(&text)
            .unwrap_or(TokenKind::Ident(text));

        self.make_token(kind)
    }

    /// Read a decimal integer literal
    fn read_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.source[self.start..self.pos]
            .iter()
            .filter(|&&c| c != '_')
            .collect();

        // Saturate so the parser reports the overflow with a position
        let value = text.parse().unwrap_or(u64::MAX);
        self.make_token(TokenKind::IntLit(value))
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.mark_start();

        let Some(c) = self.peek() else {
            return Token::eof(self.make_span());
        };

        if c.is_alphabetic() || c == '_' {
            return self.read_identifier();
        }

        if c.is_ascii_digit() {
            return self.read_number();
        }

        self.advance();
        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' => TokenKind::Eq,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            _ => TokenKind::Unknown(c),
        };

        self.make_token(kind)
    }

    /// Tokenize the entire source and return all tokens, ending with `Eof`
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
