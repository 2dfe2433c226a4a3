//! Donkey runtime object model.
//!
//! This crate provides the values a Donkey evaluator computes with and the
//! scope chain that gives user-defined functions their closure semantics.
//! It performs no evaluation of its own: an evaluator walks the AST and uses
//! [`Value`], [`Env`], [`Function::enclosed_env`] and [`Builtin::call`] as its
//! complete runtime surface.

pub mod env;
pub mod function;
pub mod value;

pub use env::Env;
pub use function::{Builtin, BuiltinFn, Function};
pub use value::{ObjectKind, RenderStyle, Rendered, Value};
