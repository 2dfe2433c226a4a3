//! Callable values: interpreted closures and native builtins.

use std::fmt;
use std::rc::Rc;

use donkey_ast::{BlockStatement, Identifier};

use crate::env::Env;
use crate::value::{RenderStyle, Value};

/// A user-defined function closed over the scope it was defined in.
///
/// Parameters and body are shared with the AST that produced them. The
/// captured [`Env`] is a shared handle, so the defining scope stays alive for
/// as long as this value (or any copy of it) is reachable.
#[derive(Clone)]
pub struct Function {
    parameters: Rc<[Identifier]>,
    body: Rc<BlockStatement>,
    env: Env,
}

impl Function {
    pub fn new(parameters: Rc<[Identifier]>, body: Rc<BlockStatement>, env: Env) -> Self {
        Self { parameters, body, env }
    }

    pub fn parameters(&self) -> &[Identifier] {
        &self.parameters
    }

    pub fn body(&self) -> &BlockStatement {
        &self.body
    }

    /// The scope captured at definition time.
    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Builds the scope a call to this function evaluates its body in.
    ///
    /// The new scope's parent is the captured environment, never the
    /// caller's. Arguments are bound to parameters positionally; surplus
    /// arguments are ignored and missing ones stay unbound, so callers check
    /// arity first.
    pub fn enclosed_env<I>(&self, args: I) -> Env
    where
        I: IntoIterator<Item = Value>,
    {
        let env = Env::new_enclosed(&self.env);
        for (param, arg) in self.parameters.iter().zip(args) {
            env.define(param.value.clone(), arg);
        }
        env
    }

    /// Same function: shared body, shared parameters and the same captured scope.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
            && Rc::ptr_eq(&self.parameters, &other.parameters)
            && self.env.ptr_eq(&other.env)
    }

    pub(crate) fn write_rendered(&self, f: &mut fmt::Formatter<'_>, style: RenderStyle) -> fmt::Result {
        write!(f, "fn(")?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        let close = match style {
            RenderStyle::Canonical => ")",
            RenderStyle::Legacy => "}",
        };
        write!(f, "{} {{\n{}\n}}", close, self.body)
    }
}

// The captured scope is left out: it can reach this very function again.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.parameters.iter().map(|p| p.value.as_str()).collect();
        f.debug_struct("Function")
            .field("parameters", &params)
            .field("body", &self.body.to_string())
            .field("scope_depth", &self.env.depth())
            .finish()
    }
}

/// Native function signature: any number of arguments in, exactly one value out.
///
/// Failures are reported by returning [`Value::Error`]; a builtin never panics
/// to signal a bad argument.
pub type BuiltinFn = dyn Fn(&[Value]) -> Value;

/// A host-provided function exposed under an ordinary identifier.
#[derive(Clone)]
pub struct Builtin {
    name: Rc<str>,
    func: Rc<BuiltinFn>,
}

impl Builtin {
    pub fn new(name: impl Into<Rc<str>>, func: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }

    pub fn ptr_eq(&self, other: &Builtin) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<builtin {}>", self.name)
    }
}
