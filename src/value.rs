// ABOUTME: Value types representing Scheme data structures and expressions

use crate::env::Environment;
use crate::error::SchemeError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

// ============================================================================
// Symbol Interning
// ============================================================================

thread_local! {
    /// One canonical allocation per symbol name, so symbol equality is a
    /// pointer comparison
    static SYMBOLS: RefCell<HashMap<Box<str>, Rc<str>>> = RefCell::new(HashMap::new());
}

/// Intern a symbol name, returning the shared allocation for it
pub fn intern(name: &str) -> Rc<str> {
    SYMBOLS.with(|table| {
        let mut table = table.borrow_mut();
        if let Some(existing) = table.get(name) {
            return existing.clone();
        }
        let shared: Rc<str> = Rc::from(name);
        table.insert(Box::from(name), shared.clone());
        shared
    })
}

// ============================================================================
// Value Model
// ============================================================================

/// Special form: receives its argument list unevaluated plus the environment
pub type PrimitiveFn = fn(&[Value], &Rc<Environment>) -> Result<Value, SchemeError>;

/// Built-in function: receives its arguments already evaluated
pub type BuiltInFn = fn(&[Value]) -> Result<Value, SchemeError>;

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Character(char),
    String(Rc<RefCell<String>>), // mutable in place via string-set!
    Symbol(Rc<str>),
    Nil,
    Pair(Rc<Pair>),
    Primitive(&'static str, PrimitiveFn),
    BuiltIn(&'static str, BuiltInFn),
    Closure(Rc<Closure>),
    Macro(Rc<MacroDef>),
}

/// A cons cell. The cdr may be any value, so chains form proper lists
/// (terminated by Nil) or improper ones.
#[derive(Debug, Clone)]
pub struct Pair {
    pub car: Value,
    pub cdr: Value,
}

/// A user function: named when it came from `(define (f ...) ...)`,
/// anonymous when it came from `lambda`. Captures its defining environment.
#[derive(Clone)]
pub struct Closure {
    pub name: Option<Rc<str>>,
    pub params: Params,
    pub body: Vec<Value>,
    pub env: Rc<Environment>,
}

/// A macro definition: parameters bind to unevaluated call arguments, the
/// body evaluates to a replacement expression.
#[derive(Clone)]
pub struct MacroDef {
    pub name: Rc<str>,
    pub params: Params,
    pub body: Value,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the captured environment is omitted: it can reference this closure
        f.debug_struct("Closure")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for MacroDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish()
    }
}

// ============================================================================
// Parameter Lists
// ============================================================================

/// Parameter list of a closure or macro. A dotted tail `(a b . rest)` means
/// at least two positional arguments, with any extras collected into a
/// proper list bound to `rest`.
#[derive(Debug, Clone)]
pub struct Params {
    pub required: Vec<Rc<str>>,
    pub rest: Option<Rc<str>>,
}

impl Params {
    /// Parse a parameter list, validating the dotted-tail marker: at most
    /// one `.`, with exactly one name after it.
    pub fn parse(form: &str, list: &Value) -> Result<Params, SchemeError> {
        let names = match list {
            Value::Nil | Value::Pair(_) => list.list_elements().ok_or_else(|| {
                SchemeError::syntax(format!("{form}: parameter list must be a proper list"))
            })?,
            other => return Err(SchemeError::type_error(form, "a list of parameters", other, 1)),
        };

        let mut symbols = Vec::with_capacity(names.len());
        for name in &names {
            match name {
                Value::Symbol(s) => symbols.push(s.clone()),
                other => {
                    return Err(SchemeError::type_error(
                        form,
                        "a symbol in the parameter list",
                        other,
                        1,
                    ));
                }
            }
        }

        let mut dot_positions = Vec::new();
        for (index, name) in symbols.iter().enumerate() {
            if &**name == "." {
                dot_positions.push(index);
            }
        }

        match dot_positions.as_slice() {
            [] => Ok(Params {
                required: symbols,
                rest: None,
            }),
            [position] => {
                if position + 2 != symbols.len() {
                    return Err(SchemeError::syntax(format!(
                        "{form}: exactly one parameter must follow '.'"
                    )));
                }
                let rest = symbols.pop();
                symbols.pop(); // the dot itself
                Ok(Params {
                    required: symbols,
                    rest,
                })
            }
            _ => Err(SchemeError::syntax(format!(
                "{form}: '.' may appear at most once in a parameter list"
            ))),
        }
    }

    /// Verify the argument count: exact for fixed parameter lists, at least
    /// `required.len()` for variadic ones.
    pub fn check_arity(&self, function: &str, actual: usize) -> Result<(), SchemeError> {
        match self.rest {
            None if actual != self.required.len() => Err(SchemeError::arity_error(
                function,
                self.required.len().to_string(),
                actual,
            )),
            Some(_) if actual < self.required.len() => Err(SchemeError::arity_error(
                function,
                format!("at least {}", self.required.len()),
                actual,
            )),
            _ => Ok(()),
        }
    }

    /// Bind arguments into the given frame; extras become the rest list
    pub fn bind(&self, frame: &Rc<Environment>, args: Vec<Value>) {
        let mut args = args.into_iter();
        for name in &self.required {
            if let Some(value) = args.next() {
                frame.insert(name.clone(), value);
            }
        }
        if let Some(rest) = &self.rest {
            frame.insert(rest.clone(), Value::list(args.collect()));
        }
    }
}

// ============================================================================
// Constructors and Accessors
// ============================================================================

impl Value {
    /// An interned symbol
    pub fn symbol(name: &str) -> Value {
        Value::Symbol(intern(name))
    }

    /// A fresh mutable string cell
    pub fn string(contents: impl Into<String>) -> Value {
        Value::String(Rc::new(RefCell::new(contents.into())))
    }

    /// A single cons cell
    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Rc::new(Pair { car, cdr }))
    }

    /// A proper list built from the given elements
    pub fn list(items: Vec<Value>) -> Value {
        Value::list_with_tail(items, Value::Nil)
    }

    /// A cons chain over `items` ending in `tail` (Nil gives a proper list)
    pub fn list_with_tail(items: Vec<Value>, tail: Value) -> Value {
        items
            .into_iter()
            .rev()
            .fold(tail, |rest, item| Value::cons(item, rest))
    }

    /// Flatten a proper list into a vector; None if the chain does not end
    /// in Nil
    pub fn list_elements(&self) -> Option<Vec<Value>> {
        let mut items = Vec::new();
        let mut current = self;
        loop {
            match current {
                Value::Nil => return Some(items),
                Value::Pair(cell) => {
                    items.push(cell.car.clone());
                    current = &cell.cdr;
                }
                _ => return None,
            }
        }
    }

    /// Only `#f` is false; every other value (including 0, "", and ()) is
    /// true
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Character(_) => "character",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Nil => "nil",
            Value::Pair(_) => "pair",
            Value::Primitive(..) => "primitive",
            Value::BuiltIn(..) => "built-in function",
            Value::Closure(_) => "function",
            Value::Macro(_) => "macro",
        }
    }

    /// The `eqv?` relation: numbers by value, characters by codepoint,
    /// strings by contents, symbols by interned pointer, compound callables
    /// and pairs by identity.
    pub fn eqv(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                *a as f64 == *b
            }
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::String(a), Value::String(b)) => *a.borrow() == *b.borrow(),
            (Value::Symbol(a), Value::Symbol(b)) => Rc::ptr_eq(a, b),
            (Value::Nil, Value::Nil) => true,
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Primitive(a, _), Value::Primitive(b, _)) => a == b,
            (Value::BuiltIn(a, _), Value::BuiltIn(b, _)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Macro(a), Value::Macro(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ============================================================================
// Printing
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => {
                // floats always show a decimal point
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Boolean(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::Character(' ') => write!(f, "#\\space"),
            Value::Character('\n') => write!(f, "#\\newline"),
            Value::Character(c) => write!(f, "#\\{}", c),
            Value::String(s) => {
                write!(f, "\"")?;
                for c in s.borrow().chars() {
                    if c == '"' {
                        write!(f, "\\\"")?;
                    } else {
                        write!(f, "{}", c)?;
                    }
                }
                write!(f, "\"")
            }
            Value::Symbol(name) => write!(f, "{}", name),
            Value::Nil => write!(f, "()"),
            Value::Pair(cell) => {
                write!(f, "({}", cell.car)?;
                let mut tail = &cell.cdr;
                loop {
                    match tail {
                        Value::Nil => break,
                        Value::Pair(next) => {
                            write!(f, " {}", next.car)?;
                            tail = &next.cdr;
                        }
                        other => {
                            write!(f, " . {}", other)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
            Value::Primitive(name, _) => write!(f, "#<primitive {}>", name),
            Value::BuiltIn(name, _) => write!(f, "#<built-in {}>", name),
            Value::Closure(c) => match &c.name {
                Some(name) => write!(f, "#<function {}>", name),
                None => write!(f, "#<lambda>"),
            },
            Value::Macro(m) => write!(f, "#<macro {}>", m.name),
        }
    }
}
