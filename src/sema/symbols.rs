//! Per-function symbol table
//!
//! One flat namespace per function: parameters and locals share it, there
//! are no nested scopes and a name can never be rebound.

use std::collections::HashMap;

use crate::middle::uir::InstRef;
use crate::types::Type;

/// Kind of symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Parameter,
    Local,
}

/// Symbol information
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub kind: SymbolKind,
    /// Parameter position or local slot, depending on `kind`
    pub index: u32,
    pub mutable: bool,
    /// The `Decl` instruction that introduced a local
    pub origin: Option<InstRef>,
}

/// Returned by [`SymbolTable::declare_local`] when the name is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duplicate;

/// Symbol table of one function
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
    next_slot: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a parameter. Parameters come from the signature and are never
    /// rejected.
    pub fn declare_parameter(&mut self, name: &str, ty: Type, index: u32) {
        self.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                ty,
                kind: SymbolKind::Parameter,
                index,
                mutable: false,
                origin: None,
            },
        );
    }

    /// Bind a local to the next free slot. A name that is already bound
    /// leaves the table untouched.
    pub fn declare_local(
        &mut self,
        name: &str,
        ty: Type,
        mutable: bool,
        origin: InstRef,
    ) -> Result<u32, Duplicate> {
        if self.symbols.contains_key(name) {
            return Err(Duplicate);
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        self.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                ty,
                kind: SymbolKind::Local,
                index: slot,
                mutable,
                origin: Some(origin),
            },
        );
        Ok(slot)
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Number of local slots handed out so far
    pub fn local_count(&self) -> u32 {
        self.next_slot
    }
}
