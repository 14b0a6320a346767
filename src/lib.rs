//! Mini compiler front and middle end
//!
//! Source text is parsed into an arena AST, lowered to untyped IR, and
//! semantically analyzed into typed IR plus diagnostics.

pub mod feedback;
pub mod frontend;
pub mod middle;
pub mod sema;
pub mod types;
pub mod utils;

use frontend::ast::Ast;
use frontend::parser::parse_source;
use middle::uir::Program;
use sema::{Analysis, SemaOptions};

/// Every stage's output for one source file. The AST and UIR are kept
/// because diagnostics point back into them.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub ast: Ast,
    pub program: Program,
    pub analysis: Analysis,
}

impl Compilation {
    /// Render every diagnostic as a text block
    pub fn render_diagnostics(&self, source: &str) -> Vec<String> {
        self.analysis
            .diagnostics
            .iter()
            .map(|diag| diag.render(&self.program, &self.ast, source))
            .collect()
    }
}

/// Parse, lower and analyze a source file. Only front-end failures are
/// errors; semantic problems are in [`Compilation::analysis`].
pub fn compile_source(source: &str, options: &SemaOptions) -> utils::Result<Compilation> {
    let ast = parse_source(source)?;
    let program = middle::uir_gen::lower(&ast);
    let analysis = sema::analyze_program(&program, options);

    Ok(Compilation {
        ast,
        program,
        analysis,
    })
}
