// src/session.rs

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::config::SessionConfig;
use crate::error::Result;
use crate::evaluator::{Evaluator, Globals};
use crate::statement::{parse_statement, Statement};
use crate::value::{Signature, Value};

/// What a successful `evaluate` call hands back for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Number(f64),
    /// Closure renderings and declaration confirmations.
    Text(String),
}

impl Output {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Output::Number(n) => Some(*n),
            Output::Text(_) => None,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Number(n) => write!(f, "{}", n),
            Output::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Display descriptor for a `def` function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
}

impl fmt::Display for FunctionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) = {}", self.name, self.params.join(", "), self.body)
    }
}

/// One calculator session: global variables and named functions that live
/// as long as the session does.
///
/// Every `evaluate` call either fully succeeds or leaves both tables as they
/// were; the right-hand side of a declaration is evaluated before anything
/// is written.
#[derive(Debug, Default)]
pub struct Session {
    globals: Globals,
    config: SessionConfig,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Session { globals: Globals::default(), config }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn evaluate(&mut self, line: &str) -> Result<Output> {
        let max_depth = self.config.max_depth;
        match parse_statement(line, max_depth)? {
            Statement::Let { name, value } => {
                let value = Evaluator::new(&self.globals, max_depth).eval_top(&value)?;
                let shown = format!("{} = {}", name, value);
                debug!(%name, kind = value.type_name(), "binding variable");
                self.globals.variables.insert(name, value);
                Ok(Output::Text(shown))
            }
            Statement::Def { name, func } => {
                let shown = format!("Function {}({}) defined", name, func.params.join(", "));
                debug!(%name, arity = func.params.len(), "defining function");
                self.globals.functions.insert(name, func);
                Ok(Output::Text(shown))
            }
            Statement::Expr(expr) => {
                match Evaluator::new(&self.globals, max_depth).eval_top(&expr)? {
                    Value::Number(n) => Ok(Output::Number(n)),
                    Value::Closure(closure) => {
                        Ok(Output::Text(Signature(&closure.params).to_string()))
                    }
                }
            }
        }
    }

    /// Number-valued globals only.
    pub fn variables(&self) -> BTreeMap<String, f64> {
        self.globals
            .variables
            .iter()
            .filter_map(|(name, value)| value.as_number().map(|n| (name.clone(), n)))
            .collect()
    }

    /// Names of globals bound to closures, sorted.
    pub fn closures(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .globals
            .variables
            .iter()
            .filter(|(_, value)| matches!(value, Value::Closure(_)))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn functions(&self) -> Vec<FunctionInfo> {
        let mut infos: Vec<FunctionInfo> = self
            .globals
            .functions
            .iter()
            .map(|(name, func)| FunctionInfo {
                name: name.clone(),
                params: func.params.to_vec(),
                body: func.body.to_string(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Drops every variable and function.
    pub fn reset(&mut self) {
        debug!("clearing session tables");
        self.globals.clear();
    }
}
