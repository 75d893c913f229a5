// ABOUTME: Evaluator module for executing parsed s-expressions

use crate::env::Environment;
use crate::error::SchemeError;
use crate::parser;
use crate::primitives;
use crate::value::{Closure, MacroDef, Value};
use std::rc::Rc;

/// Parse a whole source string and evaluate its forms in order against the
/// given environment, returning the last value (Nil for an empty program).
pub fn eval_source(source: &str, env: &Rc<Environment>) -> Result<Value, SchemeError> {
    let forms = parser::parse_program(source)?;
    let mut result = Value::Nil;
    for form in &forms {
        result = eval(form, env)?;
    }
    Ok(result)
}

/// Evaluate a single expression
pub fn eval(expr: &Value, env: &Rc<Environment>) -> Result<Value, SchemeError> {
    match expr {
        // Self-evaluating atoms
        Value::Integer(_)
        | Value::Float(_)
        | Value::Boolean(_)
        | Value::Character(_)
        | Value::String(_)
        | Value::Nil => Ok(expr.clone()),

        Value::Symbol(name) => eval_symbol(name, env),

        // Function call or special form
        Value::Pair(cell) => {
            let callee = eval(&cell.car, env)?;
            let args = cell.cdr.list_elements().ok_or_else(|| {
                SchemeError::syntax("call arguments must form a proper list")
            })?;

            match callee {
                // special forms and macros decide what to evaluate themselves
                Value::Primitive(_, f) => f(&args, env),
                Value::Macro(def) => apply_macro(&def, &args, env),

                // ordinary callables take their arguments evaluated left to right
                Value::BuiltIn(_, f) => {
                    let values = eval_args(&args, env)?;
                    f(&values)
                }
                Value::Closure(def) => {
                    let values = eval_args(&args, env)?;
                    apply_closure(&def, values)
                }

                other => Err(SchemeError::NotCallable(other.type_name().to_string())),
            }
        }

        // Callables are self-evaluating (rarely evaluated directly)
        Value::Primitive(..) | Value::BuiltIn(..) | Value::Closure(_) | Value::Macro(_) => {
            Ok(expr.clone())
        }
    }
}

/// Resolve a symbol. Special forms win over everything so `define` and
/// friends always mean themselves; built-ins live in the root frame of the
/// chain and can be shadowed by user bindings.
fn eval_symbol(name: &str, env: &Rc<Environment>) -> Result<Value, SchemeError> {
    if let Some(primitive) = primitives::lookup(name) {
        return Ok(primitive);
    }

    env.get(name)
        .ok_or_else(|| SchemeError::UndefinedVariable(name.to_string()))
}

/// Evaluate call arguments left to right
fn eval_args(args: &[Value], env: &Rc<Environment>) -> Result<Vec<Value>, SchemeError> {
    args.iter().map(|arg| eval(arg, env)).collect()
}

/// Apply a closure: new frame over the captured environment, parameters
/// bound to the evaluated arguments, body evaluated in sequence.
pub fn apply_closure(closure: &Closure, args: Vec<Value>) -> Result<Value, SchemeError> {
    let display_name = closure.name.as_deref().unwrap_or("lambda");
    closure.params.check_arity(display_name, args.len())?;

    let frame = Environment::with_parent(closure.env.clone());
    closure.params.bind(&frame, args);

    let mut result = Value::Nil;
    for expr in &closure.body {
        result = eval(expr, &frame)?;
    }
    Ok(result)
}

/// Apply a macro: bind parameters to the *unevaluated* arguments in a frame
/// over the caller's environment, evaluate the body to get the expansion,
/// then evaluate the expansion where the call appeared.
fn apply_macro(
    def: &MacroDef,
    args: &[Value],
    env: &Rc<Environment>,
) -> Result<Value, SchemeError> {
    def.params.check_arity(&def.name, args.len())?;

    let frame = Environment::with_parent(env.clone());
    def.params.bind(&frame, args.to_vec());

    let expansion = eval(&def.body, &frame)?;
    eval(&expansion, env)
}
