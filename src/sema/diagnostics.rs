//! Semantic diagnostics and their rendering
//!
//! A diagnostic stores no position of its own. It names the offending
//! instruction, and the position is recovered on demand by following
//! instruction -> AST node -> token.

use std::fmt;

use crate::frontend::ast::Ast;
use crate::middle::uir::{FunctionId, InstRef, Program};
use crate::types::Type;

/// Operator a type error is reported against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Negate,
    Add,
    Sub,
    Mul,
    Div,
    Assign,
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Negate | Op::Sub => "-",
            Op::Add => "+",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Assign => "=",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    UndefinedVariable { name: String },
    DuplicateDeclaration { name: String },
    TypeMismatch { op: Op, lhs: Type, rhs: Type },
    InvalidOperandType { op: Op, ty: Type },
    ReturnTypeMismatch { expected: Type, found: Type },
    ConflictingInferredReturnTypes { first: Type, second: Type },
    AssignToImmutable { name: String },
    NonBoolCondition { found: Type },
}

impl DiagnosticKind {
    /// Stable error code, used by the JSON report
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UndefinedVariable { .. } => "E0001",
            DiagnosticKind::DuplicateDeclaration { .. } => "E0002",
            DiagnosticKind::TypeMismatch { .. } => "E0003",
            DiagnosticKind::InvalidOperandType { .. } => "E0004",
            DiagnosticKind::ReturnTypeMismatch { .. } => "E0005",
            DiagnosticKind::ConflictingInferredReturnTypes { .. } => "E0006",
            DiagnosticKind::AssignToImmutable { .. } => "E0007",
            DiagnosticKind::NonBoolCondition { .. } => "E0008",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UndefinedVariable { name } => {
                write!(f, "use of undeclared identifier '{}'", name)
            }
            DiagnosticKind::DuplicateDeclaration { name } => write!(f, "redeclaration of '{}'", name),
            DiagnosticKind::TypeMismatch { op, lhs, rhs } => {
                write!(f, "type mismatch in '{}': {} and {}", op, lhs, rhs)
            }
            DiagnosticKind::InvalidOperandType { op, ty } => {
                write!(f, "invalid operand type {} for '{}'", ty, op)
            }
            DiagnosticKind::ReturnTypeMismatch { expected, found } => {
                write!(f, "return type mismatch: expected {}, found {}", expected, found)
            }
            DiagnosticKind::ConflictingInferredReturnTypes { first, second } => {
                write!(f, "conflicting return types: {} and {}", first, second)
            }
            DiagnosticKind::AssignToImmutable { name } => {
                write!(f, "cannot assign to immutable '{}'", name)
            }
            DiagnosticKind::NonBoolCondition { found } => {
                write!(f, "condition must be bool, found {}", found)
            }
        }
    }
}

/// A semantic error, anchored to the instruction that caused it
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub function: FunctionId,
    pub inst: InstRef,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, function: FunctionId, inst: InstRef) -> Self {
        Self { kind, function, inst }
    }

    /// `(line, column)` of the offending instruction's main token
    pub fn location(&self, program: &Program, ast: &Ast) -> (u32, u32) {
        let node = program
            .functions
            .get(self.function.index())
            .and_then(|func| func.instructions.get(self.inst.index()))
            .map(|inst| inst.node);
        let token = node.and_then(|node| ast.nodes.get(node.0 as usize)).map(|node| node.token);

        match token.and_then(|token| ast.tokens.get(token.0 as usize)) {
            Some(token) => (token.span.line, token.span.column),
            None => (1, 1),
        }
    }

    /// Render as `line:col: error: message` followed by the source line and
    /// a caret under the column
    pub fn render(&self, program: &Program, ast: &Ast, source: &str) -> String {
        let (line, column) = self.location(program, ast);
        render_at(line, column, &self.kind.message(), source)
    }
}

/// Render an error message against a 1-based source position. Lines past
/// the end of the source render as empty.
pub fn render_at(line: u32, column: u32, message: &str, source: &str) -> String {
    let source_line = (line as usize)
        .checked_sub(1)
        .and_then(|index| source.lines().nth(index))
        .unwrap_or("");
    let caret = format!("{}^", " ".repeat(column.saturating_sub(1) as usize));

    format!("{}:{}: error: {}\n{}\n{}", line, column, message, source_line, caret)
}
