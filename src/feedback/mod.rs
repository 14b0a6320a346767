//! Structured Feedback Module
//!
//! Machine-readable output for `minic check --format json`: one report per
//! diagnostic, with a stable code, the resolved position and the same
//! rendered text the human format prints.

use serde::Serialize;

use crate::sema::Diagnostic;
use crate::utils::Error;
use crate::Compilation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// A single reported problem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    /// Error code (e.g., "E0001")
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    /// `line:col: error: message` plus source excerpt and caret
    pub rendered: String,
}

/// Signature of one analyzed function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSummary {
    pub name: String,
    pub params: Vec<String>,
    pub ret_type: String,
    pub locals: u32,
}

/// Outcome of checking one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub file: String,
    pub success: bool,
    pub functions: Vec<FunctionSummary>,
    pub diagnostics: Vec<DiagnosticReport>,
}

impl DiagnosticReport {
    /// Report a semantic diagnostic of a compiled file
    pub fn from_diagnostic(diag: &Diagnostic, compilation: &Compilation, source: &str) -> Self {
        let (line, column) = diag.location(&compilation.program, &compilation.ast);
        Self {
            code: diag.kind.code().to_string(),
            severity: Severity::Error,
            message: diag.kind.message(),
            location: Location { line, column },
            rendered: diag.render(&compilation.program, &compilation.ast, source),
        }
    }

    /// Report a front-end error
    pub fn from_error(error: &Error, source: &str) -> Self {
        Self {
            code: error_code(error).to_string(),
            severity: Severity::Error,
            message: error.to_string(),
            location: Location {
                line: error.span().line,
                column: error.span().column,
            },
            rendered: error.render(source),
        }
    }
}

fn error_code(error: &Error) -> &'static str {
    match error {
        Error::UnexpectedToken { .. } => "P0001",
        Error::ExpectedIdent { .. } => "P0002",
        Error::ExpectedType { .. } => "P0003",
        Error::ExpectedExpr { .. } => "P0004",
        Error::UnknownType { .. } => "P0005",
        Error::VoidParameter { .. } => "P0006",
        Error::IntegerOverflow { .. } => "P0007",
        Error::DuplicateParameter { .. } => "P0008",
        Error::NestingTooDeep { .. } => "P0009",
    }
}

impl CheckReport {
    /// Report for a file that made it through analysis
    pub fn from_compilation(file: &str, compilation: &Compilation, source: &str) -> Self {
        let functions = compilation
            .analysis
            .functions
            .iter()
            .map(|func| FunctionSummary {
                name: func.name.clone(),
                params: func.param_types.iter().map(|ty| ty.to_string()).collect(),
                ret_type: func.ret_type.to_string(),
                locals: func.local_count,
            })
            .collect();
        let diagnostics = compilation
            .analysis
            .diagnostics
            .iter()
            .map(|diag| DiagnosticReport::from_diagnostic(diag, compilation, source))
            .collect::<Vec<_>>();

        Self {
            file: file.to_string(),
            success: diagnostics.is_empty(),
            functions,
            diagnostics,
        }
    }

    /// Report for a file the front end rejected
    pub fn from_error(file: &str, error: &Error, source: &str) -> Self {
        Self {
            file: file.to_string(),
            success: false,
            functions: vec![],
            diagnostics: vec![DiagnosticReport::from_error(error, source)],
        }
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
