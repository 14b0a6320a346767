//! Untyped IR
//!
//! Linear, name-based instruction list per function. Operands are indices
//! of earlier instructions in the same function, never values. Every
//! instruction remembers the AST node it was lowered from.

use std::fmt;

use serde::Serialize;

use crate::frontend::ast::NodeId;
use crate::types::Type;

/// Position of an instruction inside its function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InstRef(pub u32);

impl InstRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Position of a function inside its program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FunctionId(pub u32);

impl FunctionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// UIR Program - all functions of one source file
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub functions: Vec<Function>,
}

impl Program {
    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }
}

/// UIR Function
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<(String, Type)>,
    /// `None` when the signature leaves the return type to inference
    pub ret_type: Option<Type>,
    pub instructions: Vec<Instruction>,
    pub node: NodeId,
}

impl Function {
    pub fn new(name: &str, params: Vec<(String, Type)>, ret_type: Option<Type>, node: NodeId) -> Self {
        Self {
            name: name.to_string(),
            params,
            ret_type,
            instructions: Vec::new(),
            node,
        }
    }

    pub fn push(&mut self, kind: InstKind, node: NodeId) -> InstRef {
        let inst = InstRef(self.instructions.len() as u32);
        self.instructions.push(Instruction { kind, node });
        inst
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub kind: InstKind,
    pub node: NodeId,
}

/// Untyped instruction
#[derive(Debug, Clone, PartialEq)]
pub enum InstKind {
    /// Integer literal, always i32
    Constant(i32),
    BoolConstant(bool),
    /// Reference to the parameter at this position of the signature
    ParamRef(u32),
    /// Reference to a name still to be resolved
    DeclRef(String),
    Negate(InstRef),
    Add(InstRef, InstRef),
    Sub(InstRef, InstRef),
    Mul(InstRef, InstRef),
    Div(InstRef, InstRef),
    Decl { name: String, mutable: bool, value: InstRef },
    Assign { name: String, value: InstRef },
    /// Skip the next `skip` instructions unless `cond` holds
    Guard { cond: InstRef, skip: u32 },
    Return(Option<InstRef>),
}

impl InstKind {
    /// Whether the instruction yields a value other instructions can use
    pub fn produces_value(&self) -> bool {
        !matches!(
            self,
            InstKind::Decl { .. } | InstKind::Assign { .. } | InstKind::Guard { .. } | InstKind::Return(_)
        )
    }
}

impl fmt::Display for InstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstKind::Constant(v) => write!(f, "constant {}", v),
            InstKind::BoolConstant(b) => write!(f, "constant {}", b),
            InstKind::ParamRef(i) => write!(f, "param_ref {}", i),
            InstKind::DeclRef(name) => write!(f, "decl_ref \"{}\"", name),
            InstKind::Negate(x) => write!(f, "negate {}", x),
            InstKind::Add(l, r) => write!(f, "add {}, {}", l, r),
            InstKind::Sub(l, r) => write!(f, "sub {}, {}", l, r),
            InstKind::Mul(l, r) => write!(f, "mul {}, {}", l, r),
            InstKind::Div(l, r) => write!(f, "div {}, {}", l, r),
            InstKind::Decl { name, mutable, value } => {
                let keyword = if *mutable { "var" } else { "const" };
                write!(f, "decl {} \"{}\", {}", keyword, name, value)
            }
            InstKind::Assign { name, value } => write!(f, "assign \"{}\", {}", name, value),
            InstKind::Guard { cond, skip } => write!(f, "guard {}, skip {}", cond, skip),
            InstKind::Return(Some(value)) => write!(f, "return {}", value),
            InstKind::Return(None) => write!(f, "return"),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn {}(", self.name)?;
        for (i, (name, ty)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, ty)?;
        }
        match self.ret_type {
            Some(ty) => writeln!(f, ") {} {{", ty)?,
            None => writeln!(f, ") {{")?,
        }
        for (i, inst) in self.instructions.iter().enumerate() {
            writeln!(f, "    %{} = {}", i, inst.kind)?;
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", func)?;
        }
        Ok(())
    }
}
