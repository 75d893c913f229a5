// ABOUTME: Library surface - modules plus the environment bootstrap helpers

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod primitives;
pub mod value;

use env::Environment;
use error::SchemeError;
use std::rc::Rc;

/// The standard prelude, written in the hosted language and compiled into
/// the binary
pub const PRELUDE: &str = include_str!("library.scm");

/// A global environment over the built-in frame, without the prelude
pub fn bare_environment() -> Rc<Environment> {
    let root = Environment::new();
    builtins::register_builtins(&root);
    Environment::with_parent(root)
}

/// The full initial environment: built-ins in the root frame, the prelude
/// evaluated into the global frame. A prelude failure is fatal for every
/// caller, so it surfaces as an error here.
pub fn initial_environment() -> Result<Rc<Environment>, SchemeError> {
    let env = bare_environment();
    eval::eval_source(PRELUDE, &env)?;
    Ok(env)
}
