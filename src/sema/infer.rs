//! Type inference and checking
//!
//! One ordered pass over a function's instructions. Each instruction gets
//! exactly one entry in the type table. An operand typed `Error` has
//! already been reported, so its consumers become `Error` (or do nothing)
//! without reporting again.

use crate::middle::uir::{Function, FunctionId, InstKind, InstRef};
use crate::sema::diagnostics::{Diagnostic, DiagnosticKind, Op};
use crate::sema::returns::ReturnReconciler;
use crate::sema::symbols::{SymbolKind, SymbolTable};
use crate::types::Type;

/// Entry of the instruction type table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstType {
    Value(Type),
    /// Decl, Assign, Guard and Return
    NoValue,
}

/// Everything the inference pass learned about one function
#[derive(Debug)]
pub struct Inference {
    pub types: Vec<InstType>,
    pub symbols: SymbolTable,
    pub ret_type: Type,
    pub diagnostics: Vec<Diagnostic>,
}

/// Per-function analysis context
pub struct Analyzer<'a> {
    func: &'a Function,
    id: FunctionId,
    symbols: SymbolTable,
    types: Vec<InstType>,
    returns: ReturnReconciler,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Analyzer<'a> {
    pub fn new(func: &'a Function, id: FunctionId) -> Self {
        let mut symbols = SymbolTable::new();
        for (index, (name, ty)) in func.params.iter().enumerate() {
            symbols.declare_parameter(name, *ty, index as u32);
        }

        Self {
            func,
            id,
            symbols,
            types: Vec::with_capacity(func.instructions.len()),
            returns: ReturnReconciler::new(func.ret_type),
            diagnostics: Vec::new(),
        }
    }

    /// Run the pass over every instruction
    pub fn infer(mut self) -> Inference {
        let func = self.func;
        for (i, inst) in func.instructions.iter().enumerate() {
            let ty = self.infer_inst(InstRef(i as u32), &inst.kind);
            self.types.push(ty);
        }

        Inference {
            types: self.types,
            symbols: self.symbols,
            ret_type: self.returns.resolved(),
            diagnostics: self.diagnostics,
        }
    }

    fn infer_inst(&mut self, inst: InstRef, kind: &InstKind) -> InstType {
        match kind {
            InstKind::Constant(_) => InstType::Value(Type::I32),
            InstKind::BoolConstant(_) => InstType::Value(Type::Bool),

            InstKind::ParamRef(index) => {
                let ty = self
                    .func
                    .params
                    .get(*index as usize)
                    .map_or(Type::Error, |(_, ty)| *ty);
                InstType::Value(ty)
            }

            InstKind::DeclRef(name) => match self.symbols.lookup(name) {
                Some(symbol) => InstType::Value(symbol.ty),
                None => {
                    self.report(DiagnosticKind::UndefinedVariable { name: name.clone() }, inst);
                    InstType::Value(Type::Error)
                }
            },

            InstKind::Negate(operand) => InstType::Value(self.check_negate(inst, *operand)),
            InstKind::Add(l, r) => InstType::Value(self.check_binary(inst, Op::Add, *l, *r)),
            InstKind::Sub(l, r) => InstType::Value(self.check_binary(inst, Op::Sub, *l, *r)),
            InstKind::Mul(l, r) => InstType::Value(self.check_binary(inst, Op::Mul, *l, *r)),
            InstKind::Div(l, r) => InstType::Value(self.check_binary(inst, Op::Div, *l, *r)),

            InstKind::Decl { name, mutable, value } => {
                let ty = self.value_type(*value);
                if self.symbols.declare_local(name, ty, *mutable, inst).is_err() {
                    self.report(DiagnosticKind::DuplicateDeclaration { name: name.clone() }, inst);
                }
                InstType::NoValue
            }

            InstKind::Assign { name, value } => {
                self.check_assign(inst, name, *value);
                InstType::NoValue
            }

            InstKind::Guard { cond, .. } => {
                let found = self.value_type(*cond);
                if !found.is_error() && found != Type::Bool {
                    self.report(DiagnosticKind::NonBoolCondition { found }, inst);
                }
                InstType::NoValue
            }

            InstKind::Return(value) => {
                let actual = value.map_or(Type::Void, |v| self.value_type(v));
                if let Some(kind) = self.returns.observe(actual) {
                    self.report(kind, inst);
                }
                InstType::NoValue
            }
        }
    }

    fn check_negate(&mut self, inst: InstRef, operand: InstRef) -> Type {
        let ty = self.value_type(operand);
        if ty.is_error() || ty.is_numeric() {
            return ty;
        }
        self.report(DiagnosticKind::InvalidOperandType { op: Op::Negate, ty }, inst);
        Type::Error
    }

    fn check_binary(&mut self, inst: InstRef, op: Op, lhs: InstRef, rhs: InstRef) -> Type {
        let (lhs, rhs) = (self.value_type(lhs), self.value_type(rhs));
        if lhs.is_error() || rhs.is_error() {
            return Type::Error;
        }
        if lhs != rhs {
            self.report(DiagnosticKind::TypeMismatch { op, lhs, rhs }, inst);
            return Type::Error;
        }
        if !lhs.is_numeric() {
            self.report(DiagnosticKind::InvalidOperandType { op, ty: lhs }, inst);
            return Type::Error;
        }
        lhs
    }

    fn check_assign(&mut self, inst: InstRef, name: &str, value: InstRef) {
        let symbol = match self.symbols.lookup(name) {
            Some(symbol) => symbol,
            None => {
                self.report(DiagnosticKind::UndefinedVariable { name: name.to_string() }, inst);
                return;
            }
        };
        let value = self.value_type(value);
        if value.is_error() {
            return;
        }

        let kind = if symbol.kind == SymbolKind::Parameter || !symbol.mutable {
            DiagnosticKind::AssignToImmutable { name: name.to_string() }
        } else if symbol.ty.is_error() || symbol.ty == value {
            return;
        } else {
            DiagnosticKind::TypeMismatch { op: Op::Assign, lhs: symbol.ty, rhs: value }
        };
        self.report(kind, inst);
    }

    /// Type of an operand. Refs that do not name an earlier value-producing
    /// instruction count as `Error`.
    fn value_type(&self, inst: InstRef) -> Type {
        match self.types.get(inst.index()) {
            Some(InstType::Value(ty)) => *ty,
            Some(InstType::NoValue) | None => Type::Error,
        }
    }

    fn report(&mut self, kind: DiagnosticKind, inst: InstRef) {
        log::trace!("fn {}: {} at {}", self.func.name, kind, inst);
        self.diagnostics.push(Diagnostic::new(kind, self.id, inst));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::NodeId;
    use pretty_assertions::assert_eq;

    fn function(params: &[Type], ret_type: Option<Type>, body: Vec<InstKind>) -> Function {
        let params = params
            .iter()
            .enumerate()
            .map(|(i, ty)| (format!("p{}", i), *ty))
            .collect();
        let mut func = Function::new("f", params, ret_type, NodeId(0));
        for kind in body {
            func.push(kind, NodeId(0));
        }
        func
    }

    fn infer(func: &Function) -> Inference {
        Analyzer::new(func, FunctionId(0)).infer()
    }

    fn kinds(inference: &Inference) -> Vec<DiagnosticKind> {
        inference.diagnostics.iter().map(|d| d.kind.clone()).collect()
    }

    #[test]
    fn test_table_is_parallel_to_instructions() {
        let func = function(
            &[Type::I64],
            None,
            vec![
                InstKind::ParamRef(0),
                InstKind::Decl { name: "x".to_string(), mutable: false, value: InstRef(0) },
                InstKind::DeclRef("x".to_string()),
                InstKind::Negate(InstRef(2)),
                InstKind::Return(Some(InstRef(3))),
            ],
        );
        let inference = infer(&func);

        assert_eq!(
            inference.types,
            vec![
                InstType::Value(Type::I64),
                InstType::NoValue,
                InstType::Value(Type::I64),
                InstType::Value(Type::I64),
                InstType::NoValue,
            ]
        );
        assert_eq!(inference.ret_type, Type::I64);
        assert!(inference.diagnostics.is_empty());
    }

    #[test]
    fn test_use_before_declaration() {
        let func = function(
            &[],
            None,
            vec![
                InstKind::DeclRef("x".to_string()),
                InstKind::Constant(1),
                InstKind::Decl { name: "x".to_string(), mutable: false, value: InstRef(1) },
            ],
        );
        let inference = infer(&func);

        assert_eq!(
            kinds(&inference),
            vec![DiagnosticKind::UndefinedVariable { name: "x".to_string() }]
        );
        assert_eq!(inference.diagnostics[0].inst, InstRef(0));
        assert_eq!(inference.symbols.local_count(), 1);
    }

    #[test]
    fn test_error_operand_is_absorbed() {
        let func = function(
            &[Type::Bool],
            None,
            vec![
                InstKind::DeclRef("nope".to_string()),
                InstKind::ParamRef(0),
                InstKind::Add(InstRef(0), InstRef(1)),
                InstKind::Negate(InstRef(2)),
                InstKind::Mul(InstRef(3), InstRef(3)),
            ],
        );
        let inference = infer(&func);

        assert_eq!(inference.diagnostics.len(), 1);
        assert_eq!(inference.types[2], InstType::Value(Type::Error));
        assert_eq!(inference.types[4], InstType::Value(Type::Error));
    }

    #[test]
    fn test_arithmetic_on_bool() {
        let func = function(
            &[Type::Bool],
            None,
            vec![
                InstKind::ParamRef(0),
                InstKind::Negate(InstRef(0)),
                InstKind::Add(InstRef(0), InstRef(0)),
            ],
        );

        assert_eq!(
            kinds(&infer(&func)),
            vec![
                DiagnosticKind::InvalidOperandType { op: Op::Negate, ty: Type::Bool },
                DiagnosticKind::InvalidOperandType { op: Op::Add, ty: Type::Bool },
            ]
        );
    }

    #[test]
    fn test_assignment_rules() {
        let func = function(
            &[Type::I32],
            None,
            vec![
                InstKind::Constant(1),
                InstKind::Decl { name: "c".to_string(), mutable: false, value: InstRef(0) },
                InstKind::Decl { name: "v".to_string(), mutable: true, value: InstRef(0) },
                InstKind::Assign { name: "v".to_string(), value: InstRef(0) },
                InstKind::Assign { name: "c".to_string(), value: InstRef(0) },
                InstKind::Assign { name: "p0".to_string(), value: InstRef(0) },
                InstKind::BoolConstant(true),
                InstKind::Assign { name: "v".to_string(), value: InstRef(6) },
                InstKind::Assign { name: "w".to_string(), value: InstRef(0) },
            ],
        );

        assert_eq!(
            kinds(&infer(&func)),
            vec![
                DiagnosticKind::AssignToImmutable { name: "c".to_string() },
                DiagnosticKind::AssignToImmutable { name: "p0".to_string() },
                DiagnosticKind::TypeMismatch { op: Op::Assign, lhs: Type::I32, rhs: Type::Bool },
                DiagnosticKind::UndefinedVariable { name: "w".to_string() },
            ]
        );
    }

    #[test]
    fn test_guard_condition() {
        let func = function(
            &[Type::I32, Type::Bool],
            None,
            vec![
                InstKind::ParamRef(0),
                InstKind::Guard { cond: InstRef(0), skip: 0 },
                InstKind::ParamRef(1),
                InstKind::Guard { cond: InstRef(2), skip: 0 },
                InstKind::DeclRef("nope".to_string()),
                InstKind::Guard { cond: InstRef(4), skip: 0 },
            ],
        );

        assert_eq!(
            kinds(&infer(&func)),
            vec![
                DiagnosticKind::NonBoolCondition { found: Type::I32 },
                DiagnosticKind::UndefinedVariable { name: "nope".to_string() },
            ]
        );
    }

    #[test]
    fn test_bare_return_checks_against_declared() {
        let func = function(&[], Some(Type::I32), vec![InstKind::Return(None)]);

        assert_eq!(
            kinds(&infer(&func)),
            vec![DiagnosticKind::ReturnTypeMismatch { expected: Type::I32, found: Type::Void }]
        );
    }

    #[test]
    fn test_malformed_operands_do_not_panic() {
        let func = function(
            &[],
            None,
            vec![
                InstKind::ParamRef(3),
                InstKind::Negate(InstRef(7)),
                InstKind::Return(Some(InstRef(1))),
            ],
        );
        let inference = infer(&func);

        assert_eq!(inference.types.len(), 3);
        assert!(inference.diagnostics.is_empty());
        assert_eq!(inference.ret_type, Type::Void);
    }
}
