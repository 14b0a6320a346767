//! Semantic analysis for Mini
//!
//! Turns untyped IR into typed IR, one function at a time:
//! - Name resolution against a per-function symbol table
//! - Type inference and checking
//! - Return type reconciliation
//! - Typed-IR generation
//!
//! Analysis always runs to completion. Problems come back as
//! [`Diagnostic`]s next to the typed IR, never as an `Err`.

pub mod diagnostics;
pub mod infer;
pub mod lower;
pub mod returns;
pub mod symbols;

use rayon::prelude::*;

use crate::middle::tir::FunctionTypedIR;
use crate::middle::uir::{FunctionId, Program};

pub use diagnostics::{Diagnostic, DiagnosticKind, Op};

use infer::Analyzer;
use lower::TirGenerator;

/// Analysis options
#[derive(Debug, Clone)]
pub struct SemaOptions {
    /// Analyze functions on the rayon thread pool
    pub parallel: bool,
}

impl Default for SemaOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Result of analyzing a whole program
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Typed IR, in the program's function order
    pub functions: Vec<FunctionTypedIR>,
    /// Function order first, then instruction order
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    /// Compilation may only continue when this holds
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Analyze one function of `program`
pub fn analyze_function(program: &Program, id: FunctionId) -> (FunctionTypedIR, Vec<Diagnostic>) {
    let func = program.function(id);
    log::debug!("analyzing fn {} ({} instructions)", func.name, func.instructions.len());

    let inference = Analyzer::new(func, id).infer();
    let instructions = TirGenerator::new(func, &inference.types, &inference.symbols).generate();

    let typed = FunctionTypedIR {
        name: func.name.clone(),
        param_types: func.params.iter().map(|(_, ty)| *ty).collect(),
        ret_type: inference.ret_type,
        local_count: inference.symbols.local_count(),
        instructions,
    };

    log::debug!(
        "fn {}: returns {}, {} locals, {} diagnostics",
        typed.name,
        typed.ret_type,
        typed.local_count,
        inference.diagnostics.len()
    );
    (typed, inference.diagnostics)
}

/// Analyze every function of `program`
pub fn analyze_program(program: &Program, options: &SemaOptions) -> Analysis {
    let ids = (0..program.functions.len() as u32).map(FunctionId);

    let results: Vec<(FunctionTypedIR, Vec<Diagnostic>)> = if options.parallel {
        ids.collect::<Vec<_>>()
            .into_par_iter()
            .map(|id| analyze_function(program, id))
            .collect()
    } else {
        ids.map(|id| analyze_function(program, id)).collect()
    };

    let mut analysis = Analysis {
        functions: Vec::with_capacity(results.len()),
        diagnostics: Vec::new(),
    };
    for (typed, diagnostics) in results {
        analysis.functions.push(typed);
        analysis.diagnostics.extend(diagnostics);
    }

    log::debug!(
        "analyzed {} functions, {} diagnostics",
        analysis.functions.len(),
        analysis.diagnostics.len()
    );
    analysis
}
