//! Tree-walking evaluator.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use donkey_ast::*;
use donkey_object::{Builtin, Env, Value};

use crate::builtins;
use crate::config::Config;
use crate::error::EvalError;

/// Returns a sentinel (`ReturnValue` or `Error`) to the caller unchanged.
macro_rules! propagate {
    ($value:expr) => {{
        let value = $value;
        if value.is_sentinel() {
            return value;
        }
        value
    }};
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct EvalStats {
    /// Calls to user-defined functions
    pub function_calls: usize,
    /// Calls to builtins
    pub builtin_calls: usize,
    /// Error values raised by the evaluator itself
    pub errors_raised: usize,
}

pub struct Interpreter {
    /// Native functions, resolved after the scope chain misses
    builtins: HashMap<String, Builtin>,
    config: Config,
    stats: EvalStats,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_output(config, io::stdout())
    }

    /// An interpreter whose `puts` writes to `output`.
    pub fn with_output(config: Config, output: impl Write + 'static) -> Self {
        let sink: builtins::Output = Rc::new(RefCell::new(Box::new(output)));
        let builtins = builtins::standard(sink, config.render_style, config.silent)
            .into_iter()
            .map(|b| (b.name().to_string(), b))
            .collect();
        Self {
            builtins,
            config,
            stats: EvalStats::default(),
        }
    }

    pub fn stats(&self) -> EvalStats {
        self.stats.clone()
    }

    pub fn reset_stats(&mut self) {
        self.stats = EvalStats::default();
    }

    pub fn builtin_names(&self) -> Vec<String> {
        let mut v: Vec<String> = builtins::BUILTIN_NAMES.iter().map(|n| n.to_string()).collect();
        v.sort();
        v
    }

    /// Renders a value the way the configured front end should echo it.
    pub fn render(&self, value: &Value) -> String {
        value.render(self.config.render_style)
    }

    /// Evaluates top-level statements in `env`.
    ///
    /// A `return` ends the program with its unwrapped value; an error ends it
    /// with the error itself. An empty program yields `null`.
    #[tracing::instrument(level = "trace", skip_all, fields(statements = program.statements.len()))]
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> Value {
        let mut result = Value::Null;
        for stmt in &program.statements {
            result = self.eval_statement(stmt, env);
            match result {
                Value::ReturnValue(inner) => return *inner,
                Value::Error(_) => return result,
                _ => {}
            }
        }
        result
    }

    fn eval_block(&mut self, block: &BlockStatement, env: &Env) -> Value {
        let mut result = Value::Null;
        for stmt in &block.statements {
            result = propagate!(self.eval_statement(stmt, env));
        }
        result
    }

    fn eval_statement(&mut self, stmt: &Statement, env: &Env) -> Value {
        match stmt {
            Statement::Let { name, value } => {
                let v = propagate!(self.eval_expression(value, env));
                env.define(name.value.clone(), v);
                Value::Null
            }
            Statement::Return(expr) => {
                let v = propagate!(self.eval_expression(expr, env));
                Value::return_value(v)
            }
            Statement::Expression(expr) => self.eval_expression(expr, env),
        }
    }

    fn eval_expression(&mut self, expr: &Expression, env: &Env) -> Value {
        match expr {
            Expression::IntegerLiteral(n) => Value::Integer(*n),
            Expression::StringLiteral(s) => Value::string(s.as_str()),
            Expression::Boolean(b) => Value::Boolean(*b),
            Expression::Identifier(ident) => self.eval_identifier(ident, env),
            Expression::Prefix { operator, right } => {
                let right = propagate!(self.eval_expression(right, env));
                self.eval_prefix(*operator, right)
            }
            Expression::Infix { left, operator, right } => {
                let left = propagate!(self.eval_expression(left, env));
                let right = propagate!(self.eval_expression(right, env));
                self.eval_infix(*operator, left, right)
            }
            Expression::If { condition, consequence, alternative } => {
                let cond = propagate!(self.eval_expression(condition, env));
                if cond.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alt) = alternative {
                    self.eval_block(alt, env)
                } else {
                    Value::Null
                }
            }
            Expression::FunctionLiteral { parameters, body } => {
                Value::function(parameters.clone(), body.clone(), env.clone())
            }
            Expression::Call { function, arguments } => {
                let callee = propagate!(self.eval_expression(function, env));
                let args = match self.eval_expressions(arguments, env) {
                    Ok(args) => args,
                    Err(sentinel) => return sentinel,
                };
                self.apply_function(callee, args)
            }
            Expression::Array(elements) => match self.eval_expressions(elements, env) {
                Ok(items) => Value::Array(items),
                Err(sentinel) => sentinel,
            },
            Expression::Index { left, index } => {
                let left = propagate!(self.eval_expression(left, env));
                let index = propagate!(self.eval_expression(index, env));
                self.eval_index(left, index)
            }
        }
    }

    /// Evaluates left to right, stopping at the first sentinel.
    fn eval_expressions(&mut self, exprs: &[Expression], env: &Env) -> Result<Vec<Value>, Value> {
        let mut values = Vec::with_capacity(exprs.len());
        for e in exprs {
            let v = self.eval_expression(e, env);
            if v.is_sentinel() {
                return Err(v);
            }
            values.push(v);
        }
        Ok(values)
    }

    fn eval_identifier(&mut self, ident: &Identifier, env: &Env) -> Value {
        if let Some(v) = env.resolve(&ident.value) {
            return v;
        }
        if let Some(b) = self.builtins.get(&ident.value) {
            return Value::Builtin(b.clone());
        }
        self.raise(EvalError::IdentifierNotFound(ident.value.clone()))
    }

    fn eval_prefix(&mut self, operator: PrefixOperator, right: Value) -> Value {
        match (operator, right) {
            (PrefixOperator::Bang, v) => Value::Boolean(!v.is_truthy()),
            (PrefixOperator::Minus, Value::Integer(n)) => Value::Integer(n.wrapping_neg()),
            (PrefixOperator::Minus, other) => self.raise(EvalError::UnknownPrefixOperator {
                operator,
                operand: other.kind(),
            }),
        }
    }

    fn eval_infix(&mut self, operator: InfixOperator, left: Value, right: Value) -> Value {
        match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => self.eval_integer_infix(operator, *a, *b),
            (Value::Str(a), Value::Str(b)) => self.eval_string_infix(operator, a, b, &left, &right),
            _ if operator == InfixOperator::Eq => Value::Boolean(left == right),
            _ if operator == InfixOperator::NotEq => Value::Boolean(left != right),
            _ if left.kind() != right.kind() => self.raise(EvalError::TypeMismatch {
                left: left.kind(),
                operator,
                right: right.kind(),
            }),
            _ => self.raise(EvalError::UnknownInfixOperator {
                left: left.kind(),
                operator,
                right: right.kind(),
            }),
        }
    }

    fn eval_integer_infix(&mut self, operator: InfixOperator, a: i64, b: i64) -> Value {
        match operator {
            InfixOperator::Plus => Value::Integer(a.wrapping_add(b)),
            InfixOperator::Minus => Value::Integer(a.wrapping_sub(b)),
            InfixOperator::Asterisk => Value::Integer(a.wrapping_mul(b)),
            InfixOperator::Slash => {
                if b == 0 {
                    return self.raise(EvalError::DivisionByZero);
                }
                Value::Integer(a.wrapping_div(b))
            }
            InfixOperator::Lt => Value::Boolean(a < b),
            InfixOperator::Gt => Value::Boolean(a > b),
            InfixOperator::Eq => Value::Boolean(a == b),
            InfixOperator::NotEq => Value::Boolean(a != b),
        }
    }

    fn eval_string_infix(
        &mut self,
        operator: InfixOperator,
        a: &str,
        b: &str,
        left: &Value,
        right: &Value,
    ) -> Value {
        match operator {
            InfixOperator::Plus => Value::string(format!("{}{}", a, b)),
            InfixOperator::Eq => Value::Boolean(a == b),
            InfixOperator::NotEq => Value::Boolean(a != b),
            _ => self.raise(EvalError::UnknownInfixOperator {
                left: left.kind(),
                operator,
                right: right.kind(),
            }),
        }
    }

    fn eval_index(&mut self, left: Value, index: Value) -> Value {
        match (left, index) {
            (Value::Array(items), Value::Integer(i)) => usize::try_from(i)
                .ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or(Value::Null),
            (other, _) => self.raise(EvalError::IndexNotSupported(other.kind())),
        }
    }

    /// Calls a function value with already-evaluated arguments.
    ///
    /// The body runs in a fresh scope enclosed by the function's captured
    /// scope, never by the caller's.
    fn apply_function(&mut self, callee: Value, args: Vec<Value>) -> Value {
        match callee {
            Value::Function(func) => {
                if func.arity() != args.len() {
                    return self.raise(EvalError::ArityMismatch {
                        expected: func.arity(),
                        received: args.len(),
                    });
                }
                let span = tracing::trace_span!(
                    "apply_function",
                    arity = func.arity(),
                    scope_depth = func.env().depth()
                );
                let _guard = span.enter();
                self.stats.function_calls += 1;
                let call_env = func.enclosed_env(args);
                tracing::trace!(bindings = ?call_env, "entered call scope");
                match self.eval_block(func.body(), &call_env) {
                    Value::ReturnValue(inner) => *inner,
                    other => other,
                }
            }
            Value::Builtin(builtin) => {
                self.stats.builtin_calls += 1;
                tracing::trace!(builtin = builtin.name(), args = args.len(), "calling builtin");
                builtin.call(&args)
            }
            other => self.raise(EvalError::NotAFunction(other.kind())),
        }
    }

    fn raise(&mut self, err: EvalError) -> Value {
        self.stats.errors_raised += 1;
        tracing::debug!(error = %err, "raised runtime error");
        err.into()
    }
}
