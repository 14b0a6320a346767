//! Parser for Mini
//!
//! Recursive descent parser with Pratt parsing for expressions. Builds the
//! flat [`Ast`] arena directly.

use crate::frontend::ast::*;
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenId, TokenKind};
use crate::types::Type;
use crate::utils::{Error, Result};

/// Deepest nesting of unary operators and parentheses accepted
const MAX_NESTING: usize = 128;

/// The parser
pub struct Parser {
    ast: Ast,
    pos: usize,
    /// Current unary/parenthesis nesting
    depth: usize,
}

impl Parser {
    /// Create a new parser from a lexer
    pub fn new(mut lexer: Lexer) -> Self {
        Self::from_tokens(lexer.tokenize())
    }

    /// Create a parser from pre-tokenized input
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or_default();
            tokens.push(Token::eof(span));
        }
        Self {
            ast: Ast::new(tokens),
            pos: 0,
            depth: 0,
        }
    }

    // ==================== Helper Methods ====================

    fn current(&self) -> &Token {
        &self.ast.tokens[self.pos]
    }

    fn current_id(&self) -> TokenId {
        TokenId(self.pos as u32)
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.ast.tokens.get(self.pos + 1).map(|t| &t.kind)
    }

    fn advance(&mut self) -> TokenId {
        let id = self.current_id();
        if self.pos < self.ast.tokens.len() - 1 {
            self.pos += 1;
        }
        id
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn expect(&mut self, expected: TokenKind) -> Result<TokenId> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::UnexpectedToken {
            expected: expected.to_string(),
            got: self.current_kind().to_string(),
            span: self.current().span,
        }
    }

    // ==================== Parsing Methods ====================

    /// Parse a complete program
    pub fn parse_program(mut self) -> Result<Ast> {
        while !self.is_at_end() {
            let function = self.parse_function()?;
            self.ast.functions.push(function);
        }

        log::debug!(
            "parsed {} functions ({} nodes, {} tokens)",
            self.ast.functions.len(),
            self.ast.nodes.len(),
            self.ast.tokens.len()
        );
        Ok(self.ast)
    }

    /// Parse a function definition
    fn parse_function(&mut self) -> Result<NodeId> {
        if !self.check(&TokenKind::Fn) {
            return Err(self.unexpected("'fn'"));
        }
        self.advance();

        let (name_token, name) = self.parse_ident()?;

        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen)?;

        let ret_type = if self.check(&TokenKind::Ident(String::new())) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        Ok(self.ast.add_node(
            NodeKind::Function(FunctionDecl {
                name,
                params,
                ret_type,
                body,
            }),
            name_token,
        ))
    }

    fn parse_params(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();

        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            let param = self.parse_param()?;
            if params.iter().any(|p: &Param| p.name == param.name) {
                return Err(Error::DuplicateParameter {
                    span: self.ast.token(param.token).span,
                    name: param.name,
                });
            }
            params.push(param);
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    fn parse_param(&mut self) -> Result<Param> {
        let (token, name) = self.parse_ident()?;
        self.expect(TokenKind::Colon)?;

        let type_span = self.current().span;
        let ty = self.parse_type()?;
        if ty == Type::Void {
            return Err(Error::VoidParameter { name, span: type_span });
        }

        Ok(Param { name, ty, token })
    }

    fn parse_ident(&mut self) -> Result<(TokenId, String)> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => Ok((self.advance(), name)),
            _ => Err(Error::ExpectedIdent { span: self.current().span }),
        }
    }

    fn parse_type(&mut self) -> Result<Type> {
        let span = self.current().span;
        let TokenKind::Ident(name) = self.current_kind().clone() else {
            return Err(Error::ExpectedType { span });
        };
        self.advance();

        Type::from_name(&name).ok_or(Error::UnknownType { name, span })
    }

    fn parse_block(&mut self) -> Result<Vec<NodeId>> {
        self.expect(TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }

        self.expect(TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<NodeId> {
        match self.current_kind() {
            TokenKind::Const | TokenKind::Var => self.parse_decl_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Ident(_) if self.peek_kind() == Some(&TokenKind::Eq) => {
                self.parse_assign_stmt()
            }
            _ => Err(self.unexpected("statement")),
        }
    }

    fn parse_decl_stmt(&mut self) -> Result<NodeId> {
        let mutable = self.check(&TokenKind::Var);
        self.advance();

        let (token, name) = self.parse_ident()?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(self.ast.add_node(NodeKind::Decl { name, mutable, value }, token))
    }

    fn parse_assign_stmt(&mut self) -> Result<NodeId> {
        let (token, name) = self.parse_ident()?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(self.ast.add_node(NodeKind::Assign { name, value }, token))
    }

    fn parse_return_stmt(&mut self) -> Result<NodeId> {
        let token = self.expect(TokenKind::Return)?;

        let value = if !self.check(&TokenKind::Semicolon) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;

        Ok(self.ast.add_node(NodeKind::Return { value }, token))
    }

    /// `if cond: return [value];`
    fn parse_if_stmt(&mut self) -> Result<NodeId> {
        let token = self.expect(TokenKind::If)?;

        let cond = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        if !self.check(&TokenKind::Return) {
            return Err(self.unexpected("'return' after 'if' condition"));
        }
        let then = self.parse_return_stmt()?;

        Ok(self.ast.add_node(NodeKind::If { cond, then }, token))
    }

    // ==================== Expression Parsing (Pratt) ====================

    fn parse_expr(&mut self) -> Result<NodeId> {
        self.parse_expr_bp(0)
    }

    /// Parse expression with binding power (Pratt parsing)
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<NodeId> {
        let mut left = self.parse_unary()?;

        loop {
            let Some(bp) = self.current_kind().binary_precedence() else {
                break;
            };

            if bp < min_bp {
                break;
            }

            let op = Self::token_to_binop(self.current_kind());
            let op_token = self.advance();

            let right = self.parse_expr_bp(bp + 1)?;
            left = self.ast.add_node(NodeKind::Binary { op, lhs: left, rhs: right }, op_token);
        }

        Ok(left)
    }

    /// Run `parse` one nesting level deeper
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(Error::NestingTooDeep { span: self.current().span });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_unary(&mut self) -> Result<NodeId> {
        if self.check(&TokenKind::Minus) {
            let token = self.advance();
            let operand = self.nested(Self::parse_unary)?;
            return Ok(self.ast.add_node(NodeKind::Negate(operand), token));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<NodeId> {
        let token = self.current_id();
        let span = self.current().span;

        let kind = match self.current_kind().clone() {
            TokenKind::IntLit(n) => {
                let value = i32::try_from(n).map_err(|_| Error::IntegerOverflow {
                    literal: n.to_string(),
                    span,
                })?;
                NodeKind::IntLiteral(value)
            }
            TokenKind::True => NodeKind::BoolLiteral(true),
            TokenKind::False => NodeKind::BoolLiteral(false),
            TokenKind::Ident(name) => NodeKind::Ident(name),
            TokenKind::LParen => {
                self.advance();
                let inner = self.nested(Self::parse_expr)?;
                self.expect(TokenKind::RParen)?;
                return Ok(inner);
            }
            _ => return Err(Error::ExpectedExpr { span }),
        };

        self.advance();
        Ok(self.ast.add_node(kind, token))
    }

    fn token_to_binop(kind: &TokenKind) -> BinOp {
        match kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            _ => BinOp::Div,
        }
    }
}

/// Tokenize and parse a source string
pub fn parse_source(source: &str) -> Result<Ast> {
    Parser::new(Lexer::new(source)).parse_program()
}
