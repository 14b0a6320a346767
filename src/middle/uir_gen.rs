//! UIR Generator - AST to untyped IR
//!
//! Flattens each function body into evaluation order. Names are left
//! unresolved except parameters, which the signature already fixes.

use std::collections::HashMap;

use crate::frontend::ast::{Ast, BinOp, FunctionDecl, NodeId, NodeKind};
use crate::middle::uir::{Function, InstKind, InstRef, Program};

/// UIR Generator
pub struct UirGenerator<'a> {
    ast: &'a Ast,
    /// Parameter name to position, for the function being lowered
    params: HashMap<String, u32>,
}

impl<'a> UirGenerator<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self {
            ast,
            params: HashMap::new(),
        }
    }

    /// Generate UIR for every function of the AST
    pub fn generate(&mut self) -> Program {
        let ast = self.ast;
        let functions = ast
            .function_decls()
            .map(|(node, decl)| self.generate_function(node, decl))
            .collect::<Vec<_>>();

        log::debug!("lowered {} functions to UIR", functions.len());
        Program { functions }
    }

    fn generate_function(&mut self, node: NodeId, decl: &FunctionDecl) -> Function {
        let params = decl
            .params
            .iter()
            .map(|p| (p.name.clone(), p.ty))
            .collect();
        let mut func = Function::new(&decl.name, params, decl.ret_type, node);

        self.params = decl
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i as u32))
            .collect();

        for &stmt in &decl.body {
            self.generate_stmt(&mut func, stmt);
        }

        log::trace!("fn {}: {} instructions", func.name, func.instructions.len());
        func
    }

    fn generate_stmt(&mut self, func: &mut Function, node: NodeId) {
        let ast = self.ast;
        match &ast.node(node).kind {
            NodeKind::Decl { name, mutable, value } => {
                let value = self.generate_expr(func, *value);
                func.push(
                    InstKind::Decl {
                        name: name.clone(),
                        mutable: *mutable,
                        value,
                    },
                    node,
                );
            }

            NodeKind::Assign { name, value } => {
                let value = self.generate_expr(func, *value);
                func.push(InstKind::Assign { name: name.clone(), value }, node);
            }

            NodeKind::Return { value } => {
                let value = value.map(|v| self.generate_expr(func, v));
                func.push(InstKind::Return(value), node);
            }

            NodeKind::If { cond, then } => {
                let cond = self.generate_expr(func, *cond);
                let guard = func.push(InstKind::Guard { cond, skip: 0 }, node);

                let before = func.instructions.len();
                self.generate_stmt(func, *then);
                let skip = (func.instructions.len() - before) as u32;

                func.instructions[guard.index()].kind = InstKind::Guard { cond, skip };
            }

            // The parser only produces statements here
            _ => {
                self.generate_expr(func, node);
            }
        }
    }

    fn generate_expr(&mut self, func: &mut Function, node: NodeId) -> InstRef {
        let ast = self.ast;
        let kind = match &ast.node(node).kind {
            NodeKind::IntLiteral(v) => InstKind::Constant(*v),
            NodeKind::BoolLiteral(b) => InstKind::BoolConstant(*b),

            NodeKind::Ident(name) => match self.params.get(name) {
                Some(&index) => InstKind::ParamRef(index),
                None => InstKind::DeclRef(name.clone()),
            },

            NodeKind::Negate(operand) => {
                let operand = self.generate_expr(func, *operand);
                InstKind::Negate(operand)
            }

            NodeKind::Binary { op, lhs, rhs } => {
                let lhs = self.generate_expr(func, *lhs);
                let rhs = self.generate_expr(func, *rhs);
                match op {
                    BinOp::Add => InstKind::Add(lhs, rhs),
                    BinOp::Sub => InstKind::Sub(lhs, rhs),
                    BinOp::Mul => InstKind::Mul(lhs, rhs),
                    BinOp::Div => InstKind::Div(lhs, rhs),
                }
            }

            NodeKind::Function(_)
            | NodeKind::Decl { .. }
            | NodeKind::Assign { .. }
            | NodeKind::Return { .. }
            | NodeKind::If { .. } => unreachable!("statement node in expression position"),
        };

        func.push(kind, node)
    }
}

/// Lower a parsed AST to UIR
pub fn lower(ast: &Ast) -> Program {
    UirGenerator::new(ast).generate()
}
