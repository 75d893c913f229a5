//! String operations: string?, make-string, string-length, string-ref,
//! string-set!
//!
//! Strings are reference-semantic, mutable containers: `string-set!`
//! mutates in place and every alias of the string observes the change.
//! Indexing is by character, not byte.

use crate::env::Environment;
use crate::error::{SchemeError, ARITY_ONE, ARITY_ONE_OR_TWO, ARITY_THREE, ARITY_TWO};
use crate::value::{intern, Value};
use std::rc::Rc;

/// True iff the argument is a string
pub fn builtin_is_string(args: &[Value]) -> Result<Value, SchemeError> {
    if args.len() != 1 {
        return Err(SchemeError::arity_error("string?", ARITY_ONE, args.len()));
    }
    Ok(Value::Boolean(matches!(args[0], Value::String(_))))
}

/// (make-string n) builds n spaces; (make-string n c) builds n copies of c.
///
/// ```lisp
/// (make-string 3) => "   "
/// (make-string 3 #\x) => "xxx"
/// ```
pub fn builtin_make_string(args: &[Value]) -> Result<Value, SchemeError> {
    if args.is_empty() || args.len() > 2 {
        return Err(SchemeError::arity_error("make-string", ARITY_ONE_OR_TWO, args.len()));
    }

    let length = match &args[0] {
        Value::Integer(n) => *n,
        other => return Err(SchemeError::type_error("make-string", "an integer", other, 1)),
    };
    if length < 0 {
        return Err(SchemeError::invalid_argument(
            "make-string",
            format!("string length must be non-negative, got {length}"),
        ));
    }

    let fill = match args.get(1) {
        None => ' ',
        Some(Value::Character(c)) => *c,
        Some(other) => {
            return Err(SchemeError::type_error("make-string", "a character", other, 2));
        }
    };

    let mut contents = String::with_capacity(length as usize);
    for _ in 0..length {
        contents.push(fill);
    }
    Ok(Value::string(contents))
}

/// Returns the length of a string in characters
pub fn builtin_string_length(args: &[Value]) -> Result<Value, SchemeError> {
    if args.len() != 1 {
        return Err(SchemeError::arity_error("string-length", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::String(s) => Ok(Value::Integer(s.borrow().chars().count() as i64)),
        other => Err(SchemeError::type_error("string-length", "a string", other, 1)),
    }
}

/// Validate a string index argument against the string's length
fn string_index(
    function: &str,
    index_arg: &Value,
    length: usize,
    position: usize,
) -> Result<usize, SchemeError> {
    let index = match index_arg {
        Value::Integer(i) => *i,
        other => return Err(SchemeError::type_error(function, "an integer", other, position)),
    };

    if index < 0 || index as usize >= length {
        return Err(SchemeError::invalid_argument(
            function,
            format!("string index out of bounds: length is {length}, got {index}"),
        ));
    }
    Ok(index as usize)
}

/// Returns the character at an index.
///
/// ```lisp
/// (string-ref "abc" 1) => #\b
/// ```
pub fn builtin_string_ref(args: &[Value]) -> Result<Value, SchemeError> {
    if args.len() != 2 {
        return Err(SchemeError::arity_error("string-ref", ARITY_TWO, args.len()));
    }

    let contents = match &args[0] {
        Value::String(s) => s.borrow(),
        other => return Err(SchemeError::type_error("string-ref", "a string", other, 1)),
    };

    let index = string_index("string-ref", &args[1], contents.chars().count(), 2)?;
    let c = contents
        .chars()
        .nth(index)
        .ok_or_else(|| SchemeError::invalid_argument("string-ref", "string index out of bounds"))?;
    Ok(Value::Character(c))
}

/// Replaces the character at an index, mutating the string in place.
/// Returns an unspecified value.
pub fn builtin_string_set(args: &[Value]) -> Result<Value, SchemeError> {
    if args.len() != 3 {
        return Err(SchemeError::arity_error("string-set!", ARITY_THREE, args.len()));
    }

    let cell = match &args[0] {
        Value::String(s) => s,
        other => return Err(SchemeError::type_error("string-set!", "a string", other, 1)),
    };

    let replacement = match &args[2] {
        Value::Character(c) => *c,
        other => return Err(SchemeError::type_error("string-set!", "a character", other, 3)),
    };

    let mut contents = cell.borrow_mut();
    let index = string_index("string-set!", &args[1], contents.chars().count(), 2)?;

    let mut characters: Vec<char> = contents.chars().collect();
    characters[index] = replacement;
    *contents = characters.into_iter().collect();

    Ok(Value::Nil)
}

/// Register all string builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.insert(intern("string?"), Value::BuiltIn("string?", builtin_is_string));
    env.insert(
        intern("make-string"),
        Value::BuiltIn("make-string", builtin_make_string),
    );
    env.insert(
        intern("string-length"),
        Value::BuiltIn("string-length", builtin_string_length),
    );
    env.insert(
        intern("string-ref"),
        Value::BuiltIn("string-ref", builtin_string_ref),
    );
    env.insert(
        intern("string-set!"),
        Value::BuiltIn("string-set!", builtin_string_set),
    );
}
