//! Return-type reconciliation
//!
//! Tracks the effective return type of a function across all of its
//! `return` instructions, in instruction order.

use crate::sema::diagnostics::DiagnosticKind;
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnState {
    /// No declared type and no informative return yet
    NoReturnSeen,
    Declared(Type),
    /// Fixed by the first return whose type was known
    Inferred(Type),
}

#[derive(Debug, Clone)]
pub struct ReturnReconciler {
    state: ReturnState,
}

impl ReturnReconciler {
    pub fn new(declared: Option<Type>) -> Self {
        let state = match declared {
            Some(ty) => ReturnState::Declared(ty),
            None => ReturnState::NoReturnSeen,
        };
        Self { state }
    }

    /// Feed the type of one returned value (`Void` for a bare `return`)
    pub fn observe(&mut self, actual: Type) -> Option<DiagnosticKind> {
        match self.state {
            _ if actual.is_error() => None,
            ReturnState::Declared(expected) if actual != expected => {
                Some(DiagnosticKind::ReturnTypeMismatch { expected, found: actual })
            }
            ReturnState::Declared(_) => None,
            ReturnState::NoReturnSeen => {
                self.state = ReturnState::Inferred(actual);
                None
            }
            ReturnState::Inferred(first) if actual != first => {
                Some(DiagnosticKind::ConflictingInferredReturnTypes { first, second: actual })
            }
            ReturnState::Inferred(_) => None,
        }
    }

    /// The function's return type once every return has been observed
    pub fn resolved(&self) -> Type {
        match self.state {
            ReturnState::Declared(ty) | ReturnState::Inferred(ty) => ty,
            ReturnState::NoReturnSeen => Type::Void,
        }
    }
}
