//! Pair operations: car, cdr, cons, pair?
//!
//! The cons cell is the one compound data structure: proper lists are
//! Nil-terminated cons chains, and the AST itself is made of them.

use crate::env::Environment;
use crate::error::{SchemeError, ARITY_ONE, ARITY_TWO};
use crate::value::{intern, Value};
use std::rc::Rc;

/// Returns the head of a pair.
///
/// ```lisp
/// (car (cons 1 2)) => 1
/// ```
pub fn builtin_car(args: &[Value]) -> Result<Value, SchemeError> {
    if args.len() != 1 {
        return Err(SchemeError::arity_error("car", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Pair(cell) => Ok(cell.car.clone()),
        other => Err(SchemeError::type_error("car", "a pair", other, 1)),
    }
}

/// Returns the tail of a pair.
///
/// ```lisp
/// (cdr (cons 1 2)) => 2
/// (cdr '(1)) => ()
/// ```
pub fn builtin_cdr(args: &[Value]) -> Result<Value, SchemeError> {
    if args.len() != 1 {
        return Err(SchemeError::arity_error("cdr", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Pair(cell) => Ok(cell.cdr.clone()),
        other => Err(SchemeError::type_error("cdr", "a pair", other, 1)),
    }
}

/// Builds a fresh pair from two values.
pub fn builtin_cons(args: &[Value]) -> Result<Value, SchemeError> {
    if args.len() != 2 {
        return Err(SchemeError::arity_error("cons", ARITY_TWO, args.len()));
    }
    Ok(Value::cons(args[0].clone(), args[1].clone()))
}

/// True iff the argument is a non-empty pair (the empty list is not one).
pub fn builtin_is_pair(args: &[Value]) -> Result<Value, SchemeError> {
    if args.len() != 1 {
        return Err(SchemeError::arity_error("pair?", ARITY_ONE, args.len()));
    }
    Ok(Value::Boolean(matches!(args[0], Value::Pair(_))))
}

/// Register all pair builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.insert(intern("car"), Value::BuiltIn("car", builtin_car));
    env.insert(intern("cdr"), Value::BuiltIn("cdr", builtin_cdr));
    env.insert(intern("cons"), Value::BuiltIn("cons", builtin_cons));
    env.insert(intern("pair?"), Value::BuiltIn("pair?", builtin_is_pair));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cons_car_cdr() {
        let pair = builtin_cons(&[Value::Integer(1), Value::Integer(2)]).unwrap();
        assert!(matches!(builtin_car(&[pair.clone()]), Ok(Value::Integer(1))));
        assert!(matches!(builtin_cdr(&[pair]), Ok(Value::Integer(2))));
    }

    #[test]
    fn test_cdr_of_single_element_list_is_nil() {
        let list = Value::list(vec![Value::Integer(1)]);
        assert!(matches!(builtin_cdr(&[list]), Ok(Value::Nil)));
    }

    #[test]
    fn test_car_of_non_pair_is_type_error() {
        match builtin_car(&[Value::Integer(7)]) {
            Err(SchemeError::TypeMismatch { function, expected, .. }) => {
                assert_eq!(function, "car");
                assert_eq!(expected, "a pair");
            }
            other => panic!("Expected type error, got {:?}", other),
        }
        assert!(matches!(
            builtin_car(&[Value::Nil]),
            Err(SchemeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_pair_predicate() {
        let pair = Value::cons(Value::Integer(1), Value::Nil);
        assert!(matches!(builtin_is_pair(&[pair]), Ok(Value::Boolean(true))));

        // the empty list is not a pair
        assert!(matches!(builtin_is_pair(&[Value::Nil]), Ok(Value::Boolean(false))));
        assert!(matches!(
            builtin_is_pair(&[Value::Integer(1)]),
            Ok(Value::Boolean(false))
        ));
    }

    #[test]
    fn test_arity_errors() {
        assert!(matches!(builtin_car(&[]), Err(SchemeError::Arity { .. })));
        assert!(matches!(
            builtin_cons(&[Value::Integer(1)]),
            Err(SchemeError::Arity { .. })
        ));
    }
}
