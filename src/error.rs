// src/error.rs

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while handling one line of input.
///
/// Every variant is terminal for the `evaluate` call that raised it; the
/// session tables are left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unexpected character '{ch}' at position {pos}")]
    Lex { pos: usize, ch: char },

    #[error("Parse error: {0}")]
    Parse(String),

    /// `what` is one of "variable", "function" or "parameter".
    #[error("Invalid {what} name: {name}")]
    InvalidName { what: &'static str, name: String },

    #[error("Duplicate parameter name in function definition: {0}")]
    DuplicateParam(String),

    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Undefined function or closure: {0}")]
    UndefinedCallable(String),

    #[error("Type error: {0}")]
    Type(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Function {name} expects {expected} arguments, but got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Maximum nesting depth of {limit} exceeded")]
    StackDepthExceeded { limit: usize },
}

impl Error {
    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }
}
