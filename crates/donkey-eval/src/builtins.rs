//! Standard builtin functions.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use donkey_object::{Builtin, RenderStyle, Value};

use crate::error::BuiltinError;

/// Shared sink `puts` writes to.
pub(crate) type Output = Rc<RefCell<Box<dyn Write>>>;

/// Names bound by [`standard`], in table order.
pub(crate) const BUILTIN_NAMES: [&str; 6] = ["len", "first", "last", "rest", "push", "puts"];

/// Builds the standard builtin table. `puts` renders in `style` and writes
/// to `output` unless `silent` is set.
pub(crate) fn standard(output: Output, style: RenderStyle, silent: bool) -> Vec<Builtin> {
    vec![
        native("len", len),
        native("first", first),
        native("last", last),
        native("rest", rest),
        native("push", push),
        Builtin::new("puts", move |args| {
            in_band(puts(args, &output, style, silent))
        }),
    ]
}

fn native(name: &'static str, func: fn(&[Value]) -> Result<Value, BuiltinError>) -> Builtin {
    Builtin::new(name, move |args| in_band(func(args)))
}

fn in_band(result: Result<Value, BuiltinError>) -> Value {
    result.unwrap_or_else(|err| {
        tracing::debug!(error = %err, "builtin failed");
        err.into()
    })
}

fn check_arity(args: &[Value], want: usize) -> Result<(), BuiltinError> {
    if args.len() != want {
        return Err(BuiltinError::WrongArgumentCount { got: args.len(), want });
    }
    Ok(())
}

fn expect_array<'a>(name: &'static str, value: &'a Value) -> Result<&'a [Value], BuiltinError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(BuiltinError::ExpectedArray { name, kind: other.kind() }),
    }
}

/// Length of a string (in characters) or an array
fn len(args: &[Value]) -> Result<Value, BuiltinError> {
    check_arity(args, 1)?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Integer(s.chars().count() as i64)),
        Value::Array(items) => Ok(Value::Integer(items.len() as i64)),
        other => Err(BuiltinError::Unsupported { name: "len", kind: other.kind() }),
    }
}

fn first(args: &[Value]) -> Result<Value, BuiltinError> {
    check_arity(args, 1)?;
    let items = expect_array("first", &args[0])?;
    Ok(items.first().cloned().unwrap_or(Value::Null))
}

fn last(args: &[Value]) -> Result<Value, BuiltinError> {
    check_arity(args, 1)?;
    let items = expect_array("last", &args[0])?;
    Ok(items.last().cloned().unwrap_or(Value::Null))
}

/// Everything but the first element; `null` for an empty array
fn rest(args: &[Value]) -> Result<Value, BuiltinError> {
    check_arity(args, 1)?;
    match expect_array("rest", &args[0])? {
        [] => Ok(Value::Null),
        [_, tail @ ..] => Ok(Value::Array(tail.to_vec())),
    }
}

/// Returns a new array with the element appended; the argument is left as is
fn push(args: &[Value]) -> Result<Value, BuiltinError> {
    check_arity(args, 2)?;
    let items = expect_array("push", &args[0])?;
    let mut pushed = Vec::with_capacity(items.len() + 1);
    pushed.extend_from_slice(items);
    pushed.push(args[1].clone());
    Ok(Value::Array(pushed))
}

fn puts(args: &[Value], output: &Output, style: RenderStyle, silent: bool) -> Result<Value, BuiltinError> {
    if silent {
        return Ok(Value::Null);
    }
    let mut out = output.borrow_mut();
    for arg in args {
        writeln!(out, "{}", arg.display(style)).map_err(|e| BuiltinError::Output(e.to_string()))?;
    }
    out.flush().map_err(|e| BuiltinError::Output(e.to_string()))?;
    Ok(Value::Null)
}
