//! Abstract Syntax Tree definitions for Mini
//!
//! The tree is stored flat: every node lives in [`Ast::nodes`] and refers to
//! its children and to its main token by index. Later stages keep a
//! [`NodeId`] instead of copying source positions around.

use crate::frontend::token::{Token, TokenId};
use crate::types::Type;
use crate::utils::Span;

/// Index of a node in [`Ast::nodes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A parsed compilation unit
#[derive(Debug, Clone, Default)]
pub struct Ast {
    pub tokens: Vec<Token>,
    pub nodes: Vec<Node>,
    /// Function declarations in source order
    pub functions: Vec<NodeId>,
}

/// A node and the token it is anchored to
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Main token: the name for declarations and identifiers, the operator
    /// for expressions, the keyword for `return` and `if`
    pub token: TokenId,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// fn name(params) [type] { body }
    Function(FunctionDecl),
    /// const|var name = value
    Decl { name: String, mutable: bool, value: NodeId },
    /// name = value
    Assign { name: String, value: NodeId },
    /// return [value]
    Return { value: Option<NodeId> },
    /// if cond: return [value]
    If { cond: NodeId, then: NodeId },
    IntLiteral(i32),
    BoolLiteral(bool),
    Ident(String),
    /// -operand
    Negate(NodeId),
    Binary { op: BinOp, lhs: NodeId, rhs: NodeId },
}

/// Function definition
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub ret_type: Option<Type>,
    pub body: Vec<NodeId>,
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub token: TokenId,
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Ast {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            nodes: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn add_node(&mut self, kind: NodeKind, token: TokenId) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, token });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.0 as usize]
    }

    /// Follow node -> token
    pub fn token_of(&self, id: NodeId) -> &Token {
        self.token(self.node(id).token)
    }

    pub fn span_of(&self, id: NodeId) -> Span {
        self.token_of(id).span
    }

    /// `(line, column)` of a node's main token
    pub fn position_of(&self, id: NodeId) -> (u32, u32) {
        let span = self.span_of(id);
        (span.line, span.column)
    }

    /// Function declarations in source order
    pub fn function_decls(&self) -> impl Iterator<Item = (NodeId, &FunctionDecl)> + '_ {
        self.functions.iter().filter_map(move |&id| match &self.node(id).kind {
            NodeKind::Function(decl) => Some((id, decl)),
            _ => None,
        })
    }
}
