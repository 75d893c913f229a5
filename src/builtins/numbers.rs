//! Numeric predicates: number?, integer?, real?, rational?, complex?,
//! exact?, inexact?
//!
//! With only two numeric representations the tower predicates all answer
//! the same question: is this value numeric at all. Exactness is what
//! distinguishes integers (exact) from floats (inexact), and those two
//! predicates reject non-numbers outright.

use crate::env::Environment;
use crate::error::{SchemeError, ARITY_ONE};
use crate::value::{intern, Value};
use std::rc::Rc;

fn check_unary(function: &str, args: &[Value]) -> Result<(), SchemeError> {
    if args.len() != 1 {
        return Err(SchemeError::arity_error(function, ARITY_ONE, args.len()));
    }
    Ok(())
}

/// True iff the argument is an integer or a float. Registered under every
/// numeric-tower predicate name.
pub fn builtin_is_number(args: &[Value]) -> Result<Value, SchemeError> {
    check_unary("number?", args)?;
    Ok(Value::Boolean(matches!(
        args[0],
        Value::Integer(_) | Value::Float(_)
    )))
}

/// True iff the argument is an integer; floats are inexact. Non-numbers
/// are a type error.
pub fn builtin_is_exact(args: &[Value]) -> Result<Value, SchemeError> {
    check_unary("exact?", args)?;
    match &args[0] {
        Value::Integer(_) => Ok(Value::Boolean(true)),
        Value::Float(_) => Ok(Value::Boolean(false)),
        other => Err(SchemeError::type_error("exact?", "a number", other, 1)),
    }
}

/// True iff the argument is a float. Non-numbers are a type error.
pub fn builtin_is_inexact(args: &[Value]) -> Result<Value, SchemeError> {
    check_unary("inexact?", args)?;
    match &args[0] {
        Value::Float(_) => Ok(Value::Boolean(true)),
        Value::Integer(_) => Ok(Value::Boolean(false)),
        other => Err(SchemeError::type_error("inexact?", "a number", other, 1)),
    }
}

/// Register all numeric predicates in the environment
pub fn register(env: &Rc<Environment>) {
    for name in ["number?", "integer?", "real?", "rational?", "complex?"] {
        env.insert(intern(name), Value::BuiltIn("number?", builtin_is_number));
    }
    env.insert(intern("exact?"), Value::BuiltIn("exact?", builtin_is_exact));
    env.insert(
        intern("inexact?"),
        Value::BuiltIn("inexact?", builtin_is_inexact),
    );
}
