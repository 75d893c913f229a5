// ABOUTME: Error types for lexing, parsing, and evaluation failures

use crate::value::Value;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_THREE: &str = "3";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_AT_LEAST_TWO: &str = "at least 2";
pub const ARITY_ONE_OR_TWO: &str = "1-2";
pub const ARITY_TWO_OR_THREE: &str = "2-3";

#[derive(Error, Debug, Clone)]
pub enum SchemeError {
    /// Unrecognised input during tokenization, with source position
    #[error("Lexical error: unrecognised character '{character}' at line {line}, column {column}")]
    Lexical {
        character: char,
        line: usize,
        column: usize,
    },

    /// Grammar violation or malformed special-form syntax
    #[error("Parse error: {message}")]
    Syntax { message: String },

    /// Type mismatch with function name, expected type, actual type, and position
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Arity error with function name, expected count/range, and actual count
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    Arity {
        function: String,
        expected: String, // "2", "1-2", "at least 1"
        actual: usize,
    },

    /// Value of the right type but outside the allowed range
    #[error("{function}: {message}")]
    InvalidArgument { function: String, message: String },

    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Cannot redefine {0}: it is already defined in this scope")]
    RedefinedVariable(String),

    #[error("Value of type {0} is not callable")]
    NotCallable(String),
}

impl SchemeError {
    /// Create a lexical error for the character at the given position
    pub fn lexical(character: char, line: usize, column: usize) -> Self {
        SchemeError::Lexical {
            character,
            line,
            column,
        }
    }

    /// Create a syntax error; the display form prefixes "Parse error"
    pub fn syntax(message: impl Into<String>) -> Self {
        SchemeError::Syntax {
            message: message.into(),
        }
    }

    /// Create a type mismatch error with full context
    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        SchemeError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
            position,
        }
    }

    /// Create an arity error with expected and actual counts
    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        SchemeError::Arity {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create an invalid-argument error with function context
    pub fn invalid_argument(function: &str, message: impl Into<String>) -> Self {
        SchemeError::InvalidArgument {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
