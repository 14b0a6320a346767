//! Typed-IR generation
//!
//! Second walk over a function, after inference has filled in the type
//! table and the symbol table. Produces exactly one typed instruction per
//! untyped instruction. Nothing here can fail or report: whatever inference
//! rejected turns into `Poison` or `Nop`.

use crate::middle::tir::TypedInst;
use crate::middle::uir::{Function, InstKind, InstRef};
use crate::sema::infer::InstType;
use crate::sema::symbols::{Symbol, SymbolKind, SymbolTable};
use crate::types::Type;

pub struct TirGenerator<'a> {
    func: &'a Function,
    types: &'a [InstType],
    symbols: &'a SymbolTable,
}

impl<'a> TirGenerator<'a> {
    pub fn new(func: &'a Function, types: &'a [InstType], symbols: &'a SymbolTable) -> Self {
        Self { func, types, symbols }
    }

    pub fn generate(&self) -> Vec<TypedInst> {
        self.func
            .instructions
            .iter()
            .enumerate()
            .map(|(i, inst)| self.lower_inst(InstRef(i as u32), &inst.kind))
            .collect()
    }

    fn lower_inst(&self, inst: InstRef, kind: &InstKind) -> TypedInst {
        let ty = match self.types.get(inst.index()) {
            Some(InstType::Value(ty)) => *ty,
            Some(InstType::NoValue) => Type::Void,
            None => Type::Error,
        };
        if kind.produces_value() && ty.is_error() {
            return TypedInst::Poison;
        }

        match kind {
            InstKind::Constant(v) => TypedInst::ConstI32(*v),
            InstKind::BoolConstant(b) => TypedInst::ConstBool(*b),
            InstKind::ParamRef(index) => TypedInst::ParamGet { index: *index, ty },

            InstKind::DeclRef(name) => match self.symbols.lookup(name) {
                Some(Symbol { kind: SymbolKind::Parameter, index, .. }) => {
                    TypedInst::ParamGet { index: *index, ty }
                }
                Some(Symbol { kind: SymbolKind::Local, index, .. }) => {
                    TypedInst::LocalGet { slot: *index, ty }
                }
                None => TypedInst::Poison,
            },

            InstKind::Negate(x) => match ty {
                Type::I32 => TypedInst::NegI32(*x),
                Type::I64 => TypedInst::NegI64(*x),
                _ => TypedInst::Poison,
            },
            InstKind::Add(lhs, rhs) => match ty {
                Type::I32 => TypedInst::AddI32 { lhs: *lhs, rhs: *rhs },
                Type::I64 => TypedInst::AddI64 { lhs: *lhs, rhs: *rhs },
                _ => TypedInst::Poison,
            },
            InstKind::Sub(lhs, rhs) => match ty {
                Type::I32 => TypedInst::SubI32 { lhs: *lhs, rhs: *rhs },
                Type::I64 => TypedInst::SubI64 { lhs: *lhs, rhs: *rhs },
                _ => TypedInst::Poison,
            },
            InstKind::Mul(lhs, rhs) => match ty {
                Type::I32 => TypedInst::MulI32 { lhs: *lhs, rhs: *rhs },
                Type::I64 => TypedInst::MulI64 { lhs: *lhs, rhs: *rhs },
                _ => TypedInst::Poison,
            },
            InstKind::Div(lhs, rhs) => match ty {
                Type::I32 => TypedInst::DivI32 { lhs: *lhs, rhs: *rhs },
                Type::I64 => TypedInst::DivI64 { lhs: *lhs, rhs: *rhs },
                _ => TypedInst::Poison,
            },

            // Only the declaration that won the name writes its slot
            InstKind::Decl { name, value, .. } => match self.symbols.lookup(name) {
                Some(symbol) if symbol.origin == Some(inst) => TypedInst::LocalSet {
                    slot: symbol.index,
                    value: *value,
                },
                _ => TypedInst::Nop,
            },

            InstKind::Assign { name, value } => match self.assign_target(inst, name, *value) {
                Some(slot) => TypedInst::LocalSet { slot, value: *value },
                None => TypedInst::Nop,
            },

            InstKind::Guard { cond, skip } => TypedInst::SkipUnless { cond: *cond, skip: *skip },
            InstKind::Return(Some(value)) => TypedInst::Ret(*value),
            InstKind::Return(None) => TypedInst::RetVoid,
        }
    }

    /// Slot written by an assignment that passed checking. The local must
    /// have been declared before the assignment, be mutable, and agree with
    /// the value's type.
    fn assign_target(&self, inst: InstRef, name: &str, value: InstRef) -> Option<u32> {
        let symbol = self.symbols.lookup(name)?;
        let declared_before = symbol.origin.map_or(false, |origin| origin < inst);
        let value = match self.types.get(value.index()) {
            Some(InstType::Value(ty)) => *ty,
            _ => Type::Error,
        };

        if symbol.kind == SymbolKind::Local
            && symbol.mutable
            && declared_before
            && !value.is_error()
            && symbol.ty == value
        {
            Some(symbol.index)
        } else {
            None
        }
    }
}
