// ABOUTME: Special forms - callables that receive their arguments unevaluated

use crate::env::Environment;
use crate::error::{
    SchemeError, ARITY_AT_LEAST_TWO, ARITY_ONE, ARITY_THREE, ARITY_TWO, ARITY_TWO_OR_THREE,
};
use crate::eval::eval;
use crate::value::{Closure, MacroDef, Params, PrimitiveFn, Value};
use std::rc::Rc;

/// Resolve a special-form name. Consulted before the environment, so these
/// names cannot be shadowed in call position.
pub fn lookup(name: &str) -> Option<Value> {
    let form: (&'static str, PrimitiveFn) = match name {
        "define" => ("define", prim_define),
        "set!" => ("set!", prim_set),
        "if" => ("if", prim_if),
        "lambda" => ("lambda", prim_lambda),
        "quote" => ("quote", prim_quote),
        "begin" => ("begin", prim_begin),
        "quasiquote" => ("quasiquote", prim_quasiquote),
        "defmacro" => ("defmacro", prim_defmacro),
        _ => return None,
    };
    Some(Value::Primitive(form.0, form.1))
}

// ============================================================================
// define
// ============================================================================

/// (define symbol expr) binds the evaluated expression.
/// (define (name params...) body...) is function-definition sugar; the
/// resulting closure carries its name for error messages.
fn prim_define(args: &[Value], env: &Rc<Environment>) -> Result<Value, SchemeError> {
    if args.len() < 2 {
        return Err(SchemeError::arity_error("define", ARITY_AT_LEAST_TWO, args.len()));
    }

    match &args[0] {
        Value::Symbol(name) => {
            if args.len() != 2 {
                return Err(SchemeError::arity_error("define", ARITY_TWO, args.len()));
            }
            let value = eval(&args[1], env)?;
            env.define(name.clone(), value)?;
            Ok(Value::Nil)
        }

        Value::Pair(header) => {
            let name = match &header.car {
                Value::Symbol(n) => n.clone(),
                other => {
                    return Err(SchemeError::type_error(
                        "define",
                        "a symbol as the function name",
                        other,
                        1,
                    ));
                }
            };

            let params = Params::parse("define", &header.cdr)?;
            let closure = Value::Closure(Rc::new(Closure {
                name: Some(name.clone()),
                params,
                body: args[1..].to_vec(),
                env: env.clone(),
            }));

            env.define(name, closure)?;
            Ok(Value::Nil)
        }

        other => Err(SchemeError::type_error(
            "define",
            "a symbol or a function header",
            other,
            1,
        )),
    }
}

// ============================================================================
// set!
// ============================================================================

/// (set! symbol expr) reassigns the innermost binding of the symbol
fn prim_set(args: &[Value], env: &Rc<Environment>) -> Result<Value, SchemeError> {
    if args.len() != 2 {
        return Err(SchemeError::arity_error("set!", ARITY_TWO, args.len()));
    }

    let name = match &args[0] {
        Value::Symbol(name) => name,
        other => return Err(SchemeError::type_error("set!", "a symbol", other, 1)),
    };

    let value = eval(&args[1], env)?;
    env.set(name, value)?;
    Ok(Value::Nil)
}

// ============================================================================
// if
// ============================================================================

/// (if cond then) or (if cond then else). Only #f is false.
fn prim_if(args: &[Value], env: &Rc<Environment>) -> Result<Value, SchemeError> {
    if args.len() < 2 || args.len() > 3 {
        return Err(SchemeError::arity_error("if", ARITY_TWO_OR_THREE, args.len()));
    }

    let condition = eval(&args[0], env)?;
    if condition.is_truthy() {
        eval(&args[1], env)
    } else if args.len() == 3 {
        eval(&args[2], env)
    } else {
        Ok(Value::Nil)
    }
}

// ============================================================================
// lambda
// ============================================================================

/// (lambda (params...) body...) captures the current environment
fn prim_lambda(args: &[Value], env: &Rc<Environment>) -> Result<Value, SchemeError> {
    if args.len() < 2 {
        return Err(SchemeError::arity_error("lambda", ARITY_AT_LEAST_TWO, args.len()));
    }

    let params = Params::parse("lambda", &args[0])?;
    Ok(Value::Closure(Rc::new(Closure {
        name: None,
        params,
        body: args[1..].to_vec(),
        env: env.clone(),
    })))
}

// ============================================================================
// quote / begin
// ============================================================================

/// (quote x) returns x unevaluated
fn prim_quote(args: &[Value], _env: &Rc<Environment>) -> Result<Value, SchemeError> {
    if args.len() != 1 {
        return Err(SchemeError::arity_error("quote", ARITY_ONE, args.len()));
    }
    Ok(args[0].clone())
}

/// (begin e1 e2 ... eN) evaluates in order, yielding the last value
fn prim_begin(args: &[Value], env: &Rc<Environment>) -> Result<Value, SchemeError> {
    let mut result = Value::Nil;
    for expr in args {
        result = eval(expr, env)?;
    }
    Ok(result)
}

// ============================================================================
// quasiquote
// ============================================================================

/// (quasiquote template) returns the template with unquoted parts replaced
/// by their values and spliced parts flattened into the surrounding list.
fn prim_quasiquote(args: &[Value], env: &Rc<Environment>) -> Result<Value, SchemeError> {
    if args.len() != 1 {
        return Err(SchemeError::arity_error("quasiquote", ARITY_ONE, args.len()));
    }
    quasiquote_walk(&args[0], 1, env)
}

/// Walk a quasiquote template. `depth` is the nesting level: unquote fires
/// at depth 1 and is rebuilt one level shallower further in; nested
/// quasiquote increments.
fn quasiquote_walk(
    template: &Value,
    depth: usize,
    env: &Rc<Environment>,
) -> Result<Value, SchemeError> {
    if !matches!(template, Value::Pair(_)) {
        return Ok(template.clone());
    }

    if let Some(inner) = unquote_payload(template, "unquote")? {
        if depth == 1 {
            return eval(&inner, env);
        }
        let rebuilt = quasiquote_walk(&inner, depth - 1, env)?;
        return Ok(Value::list(vec![Value::symbol("unquote"), rebuilt]));
    }

    if let Some(inner) = unquote_payload(template, "quasiquote")? {
        let rebuilt = quasiquote_walk(&inner, depth + 1, env)?;
        return Ok(Value::list(vec![Value::symbol("quasiquote"), rebuilt]));
    }

    // element-wise walk, splicing where requested
    let mut items = Vec::new();
    let mut current = template.clone();
    loop {
        match current {
            Value::Nil => return Ok(Value::list(items)),
            Value::Pair(cell) => {
                let element = &cell.car;
                match unquote_payload(element, "unquote-splicing")? {
                    Some(spliced_expr) if depth == 1 => {
                        let spliced = eval(&spliced_expr, env)?;
                        match spliced.list_elements() {
                            Some(elements) => items.extend(elements),
                            None => {
                                return Err(SchemeError::type_error(
                                    "unquote-splicing",
                                    "a list",
                                    &spliced,
                                    1,
                                ));
                            }
                        }
                    }
                    _ => items.push(quasiquote_walk(element, depth, env)?),
                }
                current = cell.cdr.clone();
            }
            other => {
                // improper template tail: keep the shape
                let tail = quasiquote_walk(&other, depth, env)?;
                return Ok(Value::list_with_tail(items, tail));
            }
        }
    }
}

/// If `value` is a list of the form (keyword x), return x. A matching
/// keyword with any other argument count is an arity error.
fn unquote_payload(value: &Value, keyword: &str) -> Result<Option<Value>, SchemeError> {
    let Value::Pair(cell) = value else {
        return Ok(None);
    };
    match &cell.car {
        Value::Symbol(name) if &**name == keyword => {}
        _ => return Ok(None),
    }

    let args = cell
        .cdr
        .list_elements()
        .ok_or_else(|| SchemeError::syntax(format!("{keyword}: malformed form")))?;
    if args.len() != 1 {
        return Err(SchemeError::arity_error(keyword, ARITY_ONE, args.len()));
    }
    Ok(Some(args[0].clone()))
}

// ============================================================================
// defmacro
// ============================================================================

/// (defmacro name (params...) replacement) binds a macro. Macros may be
/// redefined, unlike variables.
fn prim_defmacro(args: &[Value], env: &Rc<Environment>) -> Result<Value, SchemeError> {
    if args.len() != 3 {
        return Err(SchemeError::arity_error("defmacro", ARITY_THREE, args.len()));
    }

    let name = match &args[0] {
        Value::Symbol(name) => name.clone(),
        other => return Err(SchemeError::type_error("defmacro", "a symbol", other, 1)),
    };

    let params = Params::parse("defmacro", &args[1])?;
    let def = MacroDef {
        name: name.clone(),
        params,
        body: args[2].clone(),
    };

    env.insert(name, Value::Macro(Rc::new(def)));
    Ok(Value::Nil)
}
