//! Value types for the Donkey runtime.

use std::fmt;
use std::rc::Rc;

use donkey_ast::{BlockStatement, Identifier};

use crate::env::Env;
use crate::function::{Builtin, Function};

/// Stable discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Integer,
    Boolean,
    Null,
    String,
    Array,
    Function,
    Builtin,
    ReturnValue,
    Error,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 9] = [
        ObjectKind::Integer,
        ObjectKind::Boolean,
        ObjectKind::Null,
        ObjectKind::String,
        ObjectKind::Array,
        ObjectKind::Function,
        ObjectKind::Builtin,
        ObjectKind::ReturnValue,
        ObjectKind::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Integer => "INTEGER",
            ObjectKind::Boolean => "BOOLEAN",
            ObjectKind::Null => "NULL",
            ObjectKind::String => "STRING",
            ObjectKind::Array => "ARRAY",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Builtin => "BUILTIN",
            ObjectKind::ReturnValue => "RETURN_VALUE",
            ObjectKind::Error => "ERROR",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How function values are rendered.
///
/// `Legacy` reproduces the historical output where the parameter list is
/// closed with `}` instead of `)`, for byte-level compatibility with old
/// transcripts. Every other variant renders identically in both styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    #[default]
    Canonical,
    Legacy,
}

/// A runtime value.
///
/// `ReturnValue` and `Error` are control-flow sentinels: the evaluator
/// propagates them upward and never treats them as operands.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer value
    Integer(i64),
    /// A boolean value (true or false)
    Boolean(bool),
    /// The absence of a value
    Null,
    /// A UTF-8 encoded string value
    Str(String),
    /// An ordered sequence of values
    Array(Vec<Value>),
    /// A user-defined function together with its defining scope
    Function(Function),
    /// A host-provided native function
    Builtin(Builtin),
    /// Wraps the value of a `return` while it unwinds to the call boundary
    ReturnValue(Box<Value>),
    /// An in-band runtime error carrying its message
    Error(String),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Value::Error(msg.into())
    }

    pub fn return_value(value: Value) -> Self {
        Value::ReturnValue(Box::new(value))
    }

    /// A function value closed over `env`.
    pub fn function(parameters: Rc<[Identifier]>, body: Rc<BlockStatement>, env: Env) -> Self {
        Value::Function(Function::new(parameters, body, env))
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Value::Integer(_) => ObjectKind::Integer,
            Value::Boolean(_) => ObjectKind::Boolean,
            Value::Null => ObjectKind::Null,
            Value::Str(_) => ObjectKind::String,
            Value::Array(_) => ObjectKind::Array,
            Value::Function(_) => ObjectKind::Function,
            Value::Builtin(_) => ObjectKind::Builtin,
            Value::ReturnValue(_) => ObjectKind::ReturnValue,
            Value::Error(_) => ObjectKind::Error,
        }
    }

    /// `null` and `false` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// True for the two variants that short-circuit evaluation.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Value::ReturnValue(_) | Value::Error(_))
    }

    /// Renders this value using the given function style.
    pub fn render(&self, style: RenderStyle) -> String {
        Rendered { value: self, style }.to_string()
    }

    /// Borrowing adapter for embedding a styled rendering in `format!`.
    pub fn display(&self, style: RenderStyle) -> Rendered<'_> {
        Rendered { value: self, style }
    }

    fn write_rendered(&self, f: &mut fmt::Formatter<'_>, style: RenderStyle) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Null => write!(f, "null"),
            Value::Str(s) => write!(f, "{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, it) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    it.write_rendered(f, style)?;
                }
                write!(f, "]")
            }
            Value::Function(func) => func.write_rendered(f, style),
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::ReturnValue(inner) => inner.write_rendered(f, style),
            Value::Error(msg) => write!(f, "ERROR: {}", msg),
        }
    }
}

/// A value paired with the style it should be rendered in.
pub struct Rendered<'a> {
    value: &'a Value,
    style: RenderStyle,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.write_rendered(f, self.style)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_rendered(f, RenderStyle::Canonical)
    }
}

/// Data variants compare structurally. Functions and builtins compare by
/// identity, since their scopes and native bodies have no structural equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Builtin(a), Value::Builtin(b)) => a.ptr_eq(b),
            (Value::ReturnValue(a), Value::ReturnValue(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
