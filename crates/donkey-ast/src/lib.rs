//! Donkey AST fragments.
//!
//! The lexer and parser live outside this workspace; this crate only defines
//! the node shapes they produce and the source rendering every node carries.

pub mod ast;

pub use ast::*;
