//! Typed IR
//!
//! Output of semantic analysis. Same shape as the UIR it came from: one
//! typed instruction per untyped instruction, so an [`InstRef`] means the
//! same thing on both sides. Names are gone, replaced by parameter indices
//! and local slots, and every arithmetic instruction is specialised to its
//! operand width.

use serde::Serialize;

use crate::middle::uir::InstRef;
use crate::types::Type;

/// Typed instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypedInst {
    ConstI32(i32),
    ConstBool(bool),
    ParamGet { index: u32, ty: Type },
    LocalGet { slot: u32, ty: Type },
    LocalSet { slot: u32, value: InstRef },

    NegI32(InstRef),
    NegI64(InstRef),
    AddI32 { lhs: InstRef, rhs: InstRef },
    AddI64 { lhs: InstRef, rhs: InstRef },
    SubI32 { lhs: InstRef, rhs: InstRef },
    SubI64 { lhs: InstRef, rhs: InstRef },
    MulI32 { lhs: InstRef, rhs: InstRef },
    MulI64 { lhs: InstRef, rhs: InstRef },
    DivI32 { lhs: InstRef, rhs: InstRef },
    DivI64 { lhs: InstRef, rhs: InstRef },

    /// If `cond` is false, skip the next `skip` instructions
    SkipUnless { cond: InstRef, skip: u32 },
    Ret(InstRef),
    RetVoid,

    /// Value that was already diagnosed
    Poison,
    /// Statement that was already diagnosed
    Nop,
}

impl TypedInst {
    /// Type of the value this instruction produces, if any
    pub fn result_type(&self) -> Option<Type> {
        match self {
            TypedInst::ConstI32(_) => Some(Type::I32),
            TypedInst::ConstBool(_) => Some(Type::Bool),
            TypedInst::ParamGet { ty, .. } | TypedInst::LocalGet { ty, .. } => Some(*ty),
            TypedInst::NegI32(_)
            | TypedInst::AddI32 { .. }
            | TypedInst::SubI32 { .. }
            | TypedInst::MulI32 { .. }
            | TypedInst::DivI32 { .. } => Some(Type::I32),
            TypedInst::NegI64(_)
            | TypedInst::AddI64 { .. }
            | TypedInst::SubI64 { .. }
            | TypedInst::MulI64 { .. }
            | TypedInst::DivI64 { .. } => Some(Type::I64),
            TypedInst::Poison => Some(Type::Error),
            TypedInst::LocalSet { .. }
            | TypedInst::SkipUnless { .. }
            | TypedInst::Ret(_)
            | TypedInst::RetVoid
            | TypedInst::Nop => None,
        }
    }
}

/// Typed IR of one function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionTypedIR {
    pub name: String,
    pub param_types: Vec<Type>,
    pub ret_type: Type,
    /// Number of local slots the body needs
    pub local_count: u32,
    pub instructions: Vec<TypedInst>,
}
