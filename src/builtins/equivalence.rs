//! Equivalence predicates: eq?, eqv?
//!
//! Both implement the same relation: structural equality across atoms
//! (numbers by value, characters by codepoint, strings by contents) and
//! identity for pairs and compound callables.

use crate::env::Environment;
use crate::error::{SchemeError, ARITY_TWO};
use crate::value::{intern, Value};
use std::rc::Rc;

/// Tests two values for equivalence.
///
/// ```lisp
/// (eqv? 1 1) => #t
/// (eqv? 'a 'a) => #t
/// (eqv? (cons 1 2) (cons 1 2)) => #f
/// ```
pub fn builtin_eqv(args: &[Value]) -> Result<Value, SchemeError> {
    if args.len() != 2 {
        return Err(SchemeError::arity_error("eqv?", ARITY_TWO, args.len()));
    }
    Ok(Value::Boolean(args[0].eqv(&args[1])))
}

/// Register the equivalence builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.insert(intern("eq?"), Value::BuiltIn("eq?", builtin_eqv));
    env.insert(intern("eqv?"), Value::BuiltIn("eqv?", builtin_eqv));
}
