//! Typed runtime faults.
//!
//! Faults are detected with these types and then lowered into an in-band
//! [`Value::Error`], which is how the rest of the evaluation sees them.

use donkey_ast::{InfixOperator, PrefixOperator};
use donkey_object::{ObjectKind, Value};
use thiserror::Error;

/// A semantic fault raised while walking the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: PrefixOperator,
        operand: ObjectKind,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: ObjectKind,
        operator: InfixOperator,
        right: ObjectKind,
    },
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: ObjectKind,
        operator: InfixOperator,
        right: ObjectKind,
    },
    #[error("not a function: {0}")]
    NotAFunction(ObjectKind),
    #[error("wrong number of arguments: want={expected}, got={received}")]
    ArityMismatch { expected: usize, received: usize },
    #[error("index operator not supported: {0}")]
    IndexNotSupported(ObjectKind),
    #[error("division by zero")]
    DivisionByZero,
}

/// A failure inside a native builtin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuiltinError {
    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongArgumentCount { got: usize, want: usize },
    #[error("argument to `{name}` not supported, got {kind}")]
    Unsupported { name: &'static str, kind: ObjectKind },
    #[error("argument to `{name}` must be ARRAY, got {kind}")]
    ExpectedArray { name: &'static str, kind: ObjectKind },
    #[error("could not write output: {0}")]
    Output(String),
}

impl From<EvalError> for Value {
    fn from(err: EvalError) -> Self {
        Value::error(err.to_string())
    }
}

impl From<BuiltinError> for Value {
    fn from(err: BuiltinError) -> Self {
        Value::error(err.to_string())
    }
}
