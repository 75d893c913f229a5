//! Character operations: char?, char=?, char<?, char>?, char<=?, char>=?
//!
//! Comparisons take exactly two characters and order them by codepoint.

use crate::env::Environment;
use crate::error::{SchemeError, ARITY_ONE, ARITY_TWO};
use crate::value::{intern, Value};
use std::rc::Rc;

/// True iff the argument is a character
pub fn builtin_is_char(args: &[Value]) -> Result<Value, SchemeError> {
    if args.len() != 1 {
        return Err(SchemeError::arity_error("char?", ARITY_ONE, args.len()));
    }
    Ok(Value::Boolean(matches!(args[0], Value::Character(_))))
}

/// Extract the two character operands of a comparison
fn char_pair(function: &str, args: &[Value]) -> Result<(char, char), SchemeError> {
    if args.len() != 2 {
        return Err(SchemeError::arity_error(function, ARITY_TWO, args.len()));
    }
    let a = match &args[0] {
        Value::Character(c) => *c,
        other => return Err(SchemeError::type_error(function, "a character", other, 1)),
    };
    let b = match &args[1] {
        Value::Character(c) => *c,
        other => return Err(SchemeError::type_error(function, "a character", other, 2)),
    };
    Ok((a, b))
}

pub fn builtin_char_eq(args: &[Value]) -> Result<Value, SchemeError> {
    let (a, b) = char_pair("char=?", args)?;
    Ok(Value::Boolean(a == b))
}

pub fn builtin_char_lt(args: &[Value]) -> Result<Value, SchemeError> {
    let (a, b) = char_pair("char<?", args)?;
    Ok(Value::Boolean(a < b))
}

pub fn builtin_char_gt(args: &[Value]) -> Result<Value, SchemeError> {
    let (a, b) = char_pair("char>?", args)?;
    Ok(Value::Boolean(a > b))
}

pub fn builtin_char_le(args: &[Value]) -> Result<Value, SchemeError> {
    let (a, b) = char_pair("char<=?", args)?;
    Ok(Value::Boolean(a <= b))
}

pub fn builtin_char_ge(args: &[Value]) -> Result<Value, SchemeError> {
    let (a, b) = char_pair("char>=?", args)?;
    Ok(Value::Boolean(a >= b))
}

/// Register all character builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.insert(intern("char?"), Value::BuiltIn("char?", builtin_is_char));
    env.insert(intern("char=?"), Value::BuiltIn("char=?", builtin_char_eq));
    env.insert(intern("char<?"), Value::BuiltIn("char<?", builtin_char_lt));
    env.insert(intern("char>?"), Value::BuiltIn("char>?", builtin_char_gt));
    env.insert(intern("char<=?"), Value::BuiltIn("char<=?", builtin_char_le));
    env.insert(intern("char>=?"), Value::BuiltIn("char>=?", builtin_char_ge));
}
