//! Arithmetic operations: +, -, *, /
//!
//! Variadic numeric operations with type promotion.
//!
//! - `+`: Sum of all arguments (identity: 0)
//! - `-`: Subtract subsequent args from first, or negate if single arg
//! - `*`: Product of all arguments (identity: 1)
//! - `/`: Divide first by subsequent args, or reciprocal if single arg;
//!   always returns a float
//!
//! A result stays an integer until a float argument appears; from then on
//! the computation is carried out in floating point. Integer overflow and
//! division by zero are reported as errors rather than wrapping or
//! producing infinities.

use crate::env::Environment;
use crate::error::{SchemeError, ARITY_AT_LEAST_ONE};
use crate::value::{intern, Value};
use std::rc::Rc;

/// Running numeric accumulator: integer until promoted
#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn from_value(function: &str, value: &Value, position: usize) -> Result<Num, SchemeError> {
        match value {
            Value::Integer(n) => Ok(Num::Int(*n)),
            Value::Float(x) => Ok(Num::Float(*x)),
            other => Err(SchemeError::type_error(function, "a number", other, position)),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Num::Int(n) => Value::Integer(n),
            Num::Float(x) => Value::Float(x),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(x) => x,
        }
    }
}

fn checked(function: &str, result: Option<i64>) -> Result<Num, SchemeError> {
    result
        .map(Num::Int)
        .ok_or_else(|| SchemeError::invalid_argument(function, "integer overflow"))
}

fn add(function: &str, a: Num, b: Num) -> Result<Num, SchemeError> {
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => checked(function, a.checked_add(b)),
        _ => Ok(Num::Float(a.as_f64() + b.as_f64())),
    }
}

fn sub(function: &str, a: Num, b: Num) -> Result<Num, SchemeError> {
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => checked(function, a.checked_sub(b)),
        _ => Ok(Num::Float(a.as_f64() - b.as_f64())),
    }
}

fn mul(function: &str, a: Num, b: Num) -> Result<Num, SchemeError> {
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => checked(function, a.checked_mul(b)),
        _ => Ok(Num::Float(a.as_f64() * b.as_f64())),
    }
}

/// Returns the sum of all arguments.
///
/// ```lisp
/// (+ 1 2 3) => 6
/// (+ 1 2.0) => 3.0
/// (+) => 0
/// ```
pub fn builtin_add(args: &[Value]) -> Result<Value, SchemeError> {
    let mut total = Num::Int(0);
    for (index, arg) in args.iter().enumerate() {
        let n = Num::from_value("+", arg, index + 1)?;
        total = add("+", total, n)?;
    }
    Ok(total.into_value())
}

/// Subtracts subsequent arguments from the first; negates a single argument.
///
/// ```lisp
/// (- 10 3 2) => 5
/// (- 5) => -5
/// ```
pub fn builtin_sub(args: &[Value]) -> Result<Value, SchemeError> {
    if args.is_empty() {
        return Err(SchemeError::arity_error("-", ARITY_AT_LEAST_ONE, 0));
    }

    let first = Num::from_value("-", &args[0], 1)?;
    if args.len() == 1 {
        return match first {
            Num::Int(n) => checked("-", n.checked_neg()).map(Num::into_value),
            Num::Float(x) => Ok(Value::Float(-x)),
        };
    }

    let mut total = first;
    for (index, arg) in args[1..].iter().enumerate() {
        let n = Num::from_value("-", arg, index + 2)?;
        total = sub("-", total, n)?;
    }
    Ok(total.into_value())
}

/// Returns the product of all arguments.
///
/// ```lisp
/// (* 2 3 4) => 24
/// (*) => 1
/// ```
pub fn builtin_mul(args: &[Value]) -> Result<Value, SchemeError> {
    let mut product = Num::Int(1);
    for (index, arg) in args.iter().enumerate() {
        let n = Num::from_value("*", arg, index + 1)?;
        product = mul("*", product, n)?;
    }
    Ok(product.into_value())
}

/// Divides the first argument by the rest; reciprocates a single argument.
/// The result is always a float.
///
/// ```lisp
/// (/ 20 4) => 5.0
/// (/ 2) => 0.5
/// ```
pub fn builtin_div(args: &[Value]) -> Result<Value, SchemeError> {
    if args.is_empty() {
        return Err(SchemeError::arity_error("/", ARITY_AT_LEAST_ONE, 0));
    }

    let first = Num::from_value("/", &args[0], 1)?.as_f64();
    if args.len() == 1 {
        if first == 0.0 {
            return Err(SchemeError::invalid_argument("/", "division by zero"));
        }
        return Ok(Value::Float(1.0 / first));
    }

    let mut result = first;
    for (index, arg) in args[1..].iter().enumerate() {
        let divisor = Num::from_value("/", arg, index + 2)?.as_f64();
        if divisor == 0.0 {
            return Err(SchemeError::invalid_argument("/", "division by zero"));
        }
        result /= divisor;
    }
    Ok(Value::Float(result))
}

/// Register all arithmetic builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.insert(intern("+"), Value::BuiltIn("+", builtin_add));
    env.insert(intern("-"), Value::BuiltIn("-", builtin_sub));
    env.insert(intern("*"), Value::BuiltIn("*", builtin_mul));
    env.insert(intern("/"), Value::BuiltIn("/", builtin_div));
}
