// src/value.rs

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Expr;

// --- Core Data Structures ---

/// Local bindings for one evaluation, layered over the session globals.
pub type Frame = HashMap<String, Value>;

/// Numeric snapshot taken when a lambda literal is evaluated.
pub type CapturedEnv = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub params: Rc<[String]>,
    pub body: Rc<Expr>,
    pub env: CapturedEnv,
}

/// A `def` function. Free variables in the body are resolved against the
/// globals at call time.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub params: Rc<[String]>,
    pub body: Rc<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Closure(Rc<Closure>),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Closure(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Closure(_) => "function",
        }
    }
}

/// `<function(x, y)>`
pub struct Signature<'a>(pub &'a [String]);

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function({})>", self.0.join(", "))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Closure(closure) => write!(f, "{}", Signature(&closure.params)),
        }
    }
}
