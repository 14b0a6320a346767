//! Middle-end module - untyped and typed IR

pub mod uir;
pub mod uir_gen;
pub mod tir;
pub mod tir_printer;
