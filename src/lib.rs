// src/lib.rs

// --- Module Declarations ---
pub mod ast;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod session;
pub mod stack;
pub mod statement;
pub mod value;

// --- Public API Re-exports ---
pub use ast::{BinaryOp, Expr};
pub use config::SessionConfig;
pub use error::{Error, Result};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::parse;
pub use session::{FunctionInfo, Output, Session};
pub use value::Value;
