//! Error handling for the Mini front end
//!
//! These are hard failures of the tokenizer/parser. Semantic problems are
//! reported as [`crate::sema::Diagnostic`] values instead.

use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Front-end error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unexpected token: expected {expected}, got {got}")]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Span,
    },

    #[error("expected identifier")]
    ExpectedIdent { span: Span },

    #[error("expected type")]
    ExpectedType { span: Span },

    #[error("expected expression")]
    ExpectedExpr { span: Span },

    #[error("unknown type: {name}")]
    UnknownType { name: String, span: Span },

    #[error("parameter '{name}' cannot have type void")]
    VoidParameter { name: String, span: Span },

    #[error("integer literal {literal} does not fit in i32")]
    IntegerOverflow { literal: String, span: Span },

    #[error("duplicate parameter '{name}'")]
    DuplicateParameter { name: String, span: Span },

    #[error("expression nested too deeply")]
    NestingTooDeep { span: Span },
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } => *span,
            Self::ExpectedIdent { span } => *span,
            Self::ExpectedType { span } => *span,
            Self::ExpectedExpr { span } => *span,
            Self::UnknownType { span, .. } => *span,
            Self::VoidParameter { span, .. } => *span,
            Self::IntegerOverflow { span, .. } => *span,
            Self::DuplicateParameter { span, .. } => *span,
            Self::NestingTooDeep { span } => *span,
        }
    }

    /// Render the error with a source excerpt, in the same layout as
    /// semantic diagnostics
    pub fn render(&self, source: &str) -> String {
        let span = self.span();
        crate::sema::diagnostics::render_at(span.line, span.column, &self.to_string(), source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_accessor() {
        let span = Span::new(3, 4, 1, 4);
        assert_eq!(Error::ExpectedExpr { span }.span(), span);
        assert_eq!(Error::NestingTooDeep { span }.span(), span);
    }

    #[test]
    fn test_render_points_at_span() {
        let err = Error::ExpectedExpr { span: Span::new(7, 8, 1, 8) };
        assert_eq!(
            err.render("return ;"),
            "1:8: error: expected expression\nreturn ;\n       ^"
        );
    }
}
