//! Donkey evaluator: a reference tree-walking interpreter over Donkey ASTs.
//!
//! The evaluator is written purely against the `donkey-object` surface:
//! values, the scope chain, the function invocation rule and the builtin
//! calling convention. Runtime faults never unwind; they become in-band
//! error values that short-circuit evaluation up to the top level.

pub mod builtins;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod logging;

pub use config::{Config, ConfigError};
pub use error::{BuiltinError, EvalError};
pub use interpreter::{EvalStats, Interpreter};

#[cfg(test)]
mod tests {
    use super::*;
    use donkey_ast::*;
    use donkey_object::{Env, Value};
    use pretty_assertions::assert_eq;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use donkey_ast::InfixOperator::*;

    fn int(n: i64) -> Expression {
        Expression::int(n)
    }

    fn id(name: &str) -> Expression {
        Expression::ident(name)
    }

    fn bin(l: Expression, op: InfixOperator, r: Expression) -> Expression {
        Expression::infix(l, op, r)
    }

    fn block(stmts: Vec<Statement>) -> BlockStatement {
        BlockStatement::new(stmts)
    }

    fn run_program(stmts: Vec<Statement>) -> Value {
        let mut interpreter = Interpreter::with_output(Config::default(), std::io::sink());
        interpreter.eval_program(&Program::new(stmts), &Env::new_root())
    }

    fn expect_value(stmts: Vec<Statement>, expected: Value) {
        let program = Program::new(stmts.clone());
        assert_eq!(run_program(stmts), expected, "Program: {}", program);
    }

    fn expect_error(stmts: Vec<Statement>, message: &str) {
        match run_program(stmts) {
            Value::Error(msg) => assert_eq!(msg, message),
            other => panic!("Expected error `{}` but got {:?}", message, other),
        }
    }

    #[test]
    fn test_literal_values() {
        expect_value(vec![int(42).into()], Value::Integer(42));
        expect_value(vec![Expression::string("hello").into()], Value::string("hello"));
        expect_value(vec![Expression::Boolean(true).into()], Value::Boolean(true));
        expect_value(vec![], Value::Null);
    }

    #[test]
    fn test_arithmetic_operations() {
        expect_value(vec![bin(int(1), Plus, int(2)).into()], Value::Integer(3));
        expect_value(vec![bin(int(5), Minus, int(3)).into()], Value::Integer(2));
        expect_value(vec![bin(int(4), Asterisk, int(6)).into()], Value::Integer(24));
        expect_value(vec![bin(int(8), Slash, int(2)).into()], Value::Integer(4));
        expect_value(
            vec![Expression::prefix(PrefixOperator::Minus, int(5)).into()],
            Value::Integer(-5),
        );
        expect_error(vec![bin(int(1), Slash, int(0)).into()], "division by zero");
    }

    #[test]
    fn test_comparison_and_bang() {
        expect_value(vec![bin(int(1), Lt, int(2)).into()], Value::Boolean(true));
        expect_value(vec![bin(int(1), Gt, int(2)).into()], Value::Boolean(false));
        expect_value(vec![bin(int(1), NotEq, int(2)).into()], Value::Boolean(true));
        expect_value(
            vec![bin(Expression::Boolean(true), Eq, Expression::Boolean(true)).into()],
            Value::Boolean(true),
        );
        expect_value(
            vec![Expression::prefix(PrefixOperator::Bang, int(5)).into()],
            Value::Boolean(false),
        );
        expect_value(
            vec![Expression::prefix(
                PrefixOperator::Bang,
                Expression::prefix(PrefixOperator::Bang, Expression::Boolean(false)),
            )
            .into()],
            Value::Boolean(false),
        );
    }

    #[test]
    fn test_string_operations() {
        expect_value(
            vec![bin(Expression::string("Hello"), Plus, Expression::string(" World!")).into()],
            Value::string("Hello World!"),
        );
        expect_value(
            vec![bin(Expression::string("a"), Eq, Expression::string("a")).into()],
            Value::Boolean(true),
        );
        expect_error(
            vec![bin(Expression::string("Hello"), Minus, Expression::string("World")).into()],
            "unknown operator: STRING - STRING",
        );
    }

    #[test]
    fn test_let_bindings() {
        expect_value(
            vec![Statement::let_("a", int(5)), id("a").into()],
            Value::Integer(5),
        );
        expect_value(
            vec![
                Statement::let_("a", int(5)),
                Statement::let_("b", id("a")),
                Statement::let_("c", bin(bin(id("a"), Plus, id("b")), Plus, int(5))),
                id("c").into(),
            ],
            Value::Integer(15),
        );
    }

    #[test]
    fn test_if_else() {
        let cond = |c: Expression| {
            Expression::if_else(
                c,
                block(vec![int(10).into()]),
                Some(block(vec![int(20).into()])),
            )
        };
        expect_value(vec![cond(Expression::Boolean(true)).into()], Value::Integer(10));
        expect_value(vec![cond(bin(int(1), Gt, int(2))).into()], Value::Integer(20));
        expect_value(vec![cond(int(0)).into()], Value::Integer(10));
        expect_value(
            vec![Expression::if_else(Expression::Boolean(false), block(vec![int(1).into()]), None).into()],
            Value::Null,
        );
    }

    #[test]
    fn test_return_statements() {
        expect_value(
            vec![Statement::Return(int(10)), int(9).into()],
            Value::Integer(10),
        );
        // Nested blocks: the inner return wins.
        let nested = Expression::if_else(
            bin(int(10), Gt, int(1)),
            block(vec![
                Expression::if_else(
                    bin(int(10), Gt, int(1)),
                    block(vec![Statement::Return(int(10))]),
                    None,
                )
                .into(),
                Statement::Return(int(1)),
            ]),
            None,
        );
        expect_value(vec![nested.into()], Value::Integer(10));
    }

    #[test]
    fn test_error_handling() {
        expect_error(vec![bin(int(5), Plus, Expression::Boolean(true)).into()], "type mismatch: INTEGER + BOOLEAN");
        expect_error(
            vec![bin(int(5), Plus, Expression::Boolean(true)).into(), int(5).into()],
            "type mismatch: INTEGER + BOOLEAN",
        );
        expect_error(
            vec![Expression::prefix(PrefixOperator::Minus, Expression::Boolean(true)).into()],
            "unknown operator: -BOOLEAN",
        );
        expect_error(
            vec![bin(Expression::Boolean(true), Plus, Expression::Boolean(false)).into()],
            "unknown operator: BOOLEAN + BOOLEAN",
        );
        expect_error(vec![id("foobar").into()], "identifier not found: foobar");
        expect_error(vec![Expression::call(int(1), vec![]).into()], "not a function: INTEGER");
    }

    #[test]
    fn test_functions_and_calls() {
        let identity = Expression::function(["x"], block(vec![Statement::Return(id("x"))]));
        expect_value(
            vec![
                Statement::let_("identity", identity),
                Expression::call(id("identity"), vec![int(5)]).into(),
            ],
            Value::Integer(5),
        );
        let add = Expression::function(["x", "y"], block(vec![bin(id("x"), Plus, id("y")).into()]));
        expect_value(
            vec![
                Statement::let_("add", add.clone()),
                Expression::call(id("add"), vec![int(5), Expression::call(id("add"), vec![int(5), int(5)])]).into(),
            ],
            Value::Integer(15),
        );
        expect_value(
            vec![Expression::call(
                Expression::function(["x"], block(vec![id("x").into()])),
                vec![int(5)],
            )
            .into()],
            Value::Integer(5),
        );
        expect_error(
            vec![Statement::let_("add", add), Expression::call(id("add"), vec![int(1)]).into()],
            "wrong number of arguments: want=2, got=1",
        );
    }

    #[test]
    fn test_arrays_and_indexing() {
        let arr = Expression::Array(vec![int(1), bin(int(2), Asterisk, int(2)), int(3)]);
        expect_value(
            vec![arr.clone().into()],
            Value::Array(vec![Value::Integer(1), Value::Integer(4), Value::Integer(3)]),
        );
        expect_value(vec![Expression::index(arr.clone(), int(1)).into()], Value::Integer(4));
        expect_value(vec![Expression::index(arr.clone(), int(3)).into()], Value::Null);
        expect_value(vec![Expression::index(arr, int(-1)).into()], Value::Null);
        expect_error(
            vec![Expression::index(int(1), int(0)).into()],
            "index operator not supported: INTEGER",
        );
    }

    #[test]
    fn test_builtin_functions() {
        expect_value(
            vec![Expression::call(id("len"), vec![Expression::string("four")]).into()],
            Value::Integer(4),
        );
        expect_error(
            vec![Expression::call(id("len"), vec![int(1)]).into()],
            "argument to `len` not supported, got INTEGER",
        );
        expect_value(
            vec![Expression::call(id("first"), vec![Expression::Array(vec![int(7), int(8)])]).into()],
            Value::Integer(7),
        );
    }

    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_call_scope_creation_is_traced() {
        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let identity = Expression::function(["x"], block(vec![id("x").into()]));
        let result = tracing::subscriber::with_default(subscriber, || {
            run_program(vec![Expression::call(identity, vec![int(5)]).into()])
        });
        assert_eq!(result, Value::Integer(5));

        let logs = String::from_utf8_lossy(&capture.0.lock().unwrap()).into_owned();
        assert_eq!(logs.matches("entered call scope").count(), 1, "logs: {}", logs);
        assert!(logs.contains("apply_function"), "logs: {}", logs);
    }

    #[test]
    fn test_builtins_are_shadowable() {
        expect_value(
            vec![Statement::let_("len", int(3)), id("len").into()],
            Value::Integer(3),
        );
    }

    #[test]
    fn test_stats_track_calls_and_errors() {
        let mut interpreter = Interpreter::with_output(Config::default(), std::io::sink());
        let env = Env::new_root();
        let program = Program::new(vec![
            Statement::let_("f", Expression::function(["x"], block(vec![id("x").into()]))),
            Expression::call(id("f"), vec![Expression::call(id("len"), vec![Expression::string("ab")])]).into(),
        ]);
        assert_eq!(interpreter.eval_program(&program, &env), Value::Integer(2));
        let _ = interpreter.eval_program(&Program::new(vec![id("missing").into()]), &env);
        assert_eq!(
            interpreter.stats(),
            EvalStats { function_calls: 1, builtin_calls: 1, errors_raised: 1 }
        );
        interpreter.reset_stats();
        assert_eq!(interpreter.stats(), EvalStats::default());
        assert_eq!(
            interpreter.builtin_names(),
            vec!["first", "last", "len", "push", "puts", "rest"]
        );
    }
}
