//! TIR Printer - Pretty print typed IR
//!
//! Outputs human-readable typed IR for debugging and `minic emit`. Value
//! instructions are annotated with the type they produce.

use std::fmt;

use crate::middle::tir::{FunctionTypedIR, TypedInst};

impl fmt::Display for TypedInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedInst::ConstI32(v) => write!(f, "const.i32 {}", v),
            TypedInst::ConstBool(b) => write!(f, "const.bool {}", b),
            TypedInst::ParamGet { index, .. } => write!(f, "param {}", index),
            TypedInst::LocalGet { slot, .. } => write!(f, "local.get {}", slot),
            TypedInst::LocalSet { slot, value } => write!(f, "local.set {}, {}", slot, value),
            TypedInst::NegI32(x) => write!(f, "neg.i32 {}", x),
            TypedInst::NegI64(x) => write!(f, "neg.i64 {}", x),
            TypedInst::AddI32 { lhs, rhs } => write!(f, "add.i32 {}, {}", lhs, rhs),
            TypedInst::AddI64 { lhs, rhs } => write!(f, "add.i64 {}, {}", lhs, rhs),
            TypedInst::SubI32 { lhs, rhs } => write!(f, "sub.i32 {}, {}", lhs, rhs),
            TypedInst::SubI64 { lhs, rhs } => write!(f, "sub.i64 {}, {}", lhs, rhs),
            TypedInst::MulI32 { lhs, rhs } => write!(f, "mul.i32 {}, {}", lhs, rhs),
            TypedInst::MulI64 { lhs, rhs } => write!(f, "mul.i64 {}, {}", lhs, rhs),
            TypedInst::DivI32 { lhs, rhs } => write!(f, "div.i32 {}, {}", lhs, rhs),
            TypedInst::DivI64 { lhs, rhs } => write!(f, "div.i64 {}, {}", lhs, rhs),
            TypedInst::SkipUnless { cond, skip } => write!(f, "skip_unless {}, {}", cond, skip),
            TypedInst::Ret(value) => write!(f, "ret {}", value),
            TypedInst::RetVoid => write!(f, "ret void"),
            TypedInst::Poison => write!(f, "poison"),
            TypedInst::Nop => write!(f, "nop"),
        }
    }
}

impl fmt::Display for FunctionTypedIR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn {}(", self.name)?;
        for (i, ty) in self.param_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        writeln!(f, ") -> {} [locals: {}]", self.ret_type, self.local_count)?;

        for (i, inst) in self.instructions.iter().enumerate() {
            match inst.result_type() {
                Some(ty) => writeln!(f, "    %{}: {} = {}", i, ty, inst)?,
                None => writeln!(f, "    %{} = {}", i, inst)?,
            }
        }
        Ok(())
    }
}

/// Print typed IR to a string, functions separated by blank lines
pub fn print_functions(functions: &[FunctionTypedIR]) -> String {
    functions
        .iter()
        .map(|func| func.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middle::uir::InstRef;
    use crate::types::Type;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_print_function() {
        let func = FunctionTypedIR {
            name: "add".to_string(),
            param_types: vec![Type::I32, Type::I32],
            ret_type: Type::I32,
            local_count: 0,
            instructions: vec![
                TypedInst::ParamGet { index: 0, ty: Type::I32 },
                TypedInst::ParamGet { index: 1, ty: Type::I32 },
                TypedInst::AddI32 { lhs: InstRef(0), rhs: InstRef(1) },
                TypedInst::Ret(InstRef(2)),
            ],
        };

        assert_eq!(
            print_functions(&[func]),
            "fn add(i32, i32) -> i32 [locals: 0]\n\
             \x20   %0: i32 = param 0\n\
             \x20   %1: i32 = param 1\n\
             \x20   %2: i32 = add.i32 %0, %1\n\
             \x20   %3 = ret %2\n"
        );
    }

    #[test]
    fn test_print_placeholders() {
        let func = FunctionTypedIR {
            name: "foo".to_string(),
            param_types: vec![],
            ret_type: Type::Void,
            local_count: 1,
            instructions: vec![
                TypedInst::Poison,
                TypedInst::Nop,
                TypedInst::LocalGet { slot: 0, ty: Type::I64 },
                TypedInst::RetVoid,
            ],
        };
        let text = print_functions(&[func.clone(), func]);

        assert!(text.starts_with("fn foo() -> void [locals: 1]\n"));
        assert!(text.contains("%0: <error> = poison\n"));
        assert!(text.contains("%1 = nop\n"));
        assert!(text.contains("%2: i64 = local.get 0\n"));
        assert!(text.contains("%3 = ret void\n\nfn foo()"));
    }
}
