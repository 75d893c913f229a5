// ABOUTME: Configuration and constants for the interpreter driver

pub const VERSION: &str = "0.1.0";

pub const WELCOME_MESSAGE: &str = "minischeme v0.1";
pub const WELCOME_SUBTITLE: &str = "A minimal Scheme-family Lisp in Rust";
pub const WELCOME_FOOTER: &str = "Type any expression to evaluate it. Use Ctrl-D or (quit) to exit.";

pub const PROMPT: &str = "scheme> ";
pub const HISTORY_FILE: &str = ".minischeme_history";
