//! Type System for Mini

use std::fmt;

use serde::Serialize;

/// Primitive types
///
/// `Error` is the sentinel for a value whose problem has already been
/// reported. Consumers of an `Error` operand stay silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    I32,
    I64,
    Bool,
    Void,
    Error,
}

impl Type {
    /// Get the size in bytes
    pub fn size_of(&self) -> usize {
        match self {
            Self::I32 => 4,
            Self::I64 => 8,
            Self::Bool => 1,
            Self::Void | Self::Error => 0,
        }
    }

    /// Check if this is an arithmetic type
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::I32 | Self::I64)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Source-level spelling of the type
    pub fn name_of(&self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Bool => "bool",
            Self::Void => "void",
            Self::Error => "<error>",
        }
    }

    /// Resolve a type name written in source
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "i32" => Some(Self::I32),
            "i64" => Some(Self::I64),
            "bool" => Some(Self::Bool),
            "void" => Some(Self::Void),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name_of())
    }
}
