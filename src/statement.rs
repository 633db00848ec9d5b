// src/statement.rs

//! Top-level statements: `let`, `def`, or a bare expression.
//!
//! The split happens on raw text before lexing. A `let` is divided at its
//! first `=` that does not start a `=>`, since lambda arrows on the
//! right-hand side contain `=` too.

use std::collections::HashSet;
use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::ast::Expr;
use crate::error::{Error, Result};
use crate::parser::parse_str;
use crate::value::FunctionDef;

const LET_FORMAT: &str = "Invalid variable declaration. Format: let name = expression";
const DEF_FORMAT: &str =
    "Invalid function definition. Format: def name(param1, param2, ...) = expression";

lazy_static! {
    static ref IDENT_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref DEF_RE: Regex = Regex::new(r"(?s)^([^\s(]+)\s*\(([^)]*)\)\s*=(.*)$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let { name: String, value: Expr },
    Def { name: String, func: FunctionDef },
    Expr(Expr),
}

pub fn is_identifier(name: &str) -> bool {
    IDENT_RE.is_match(name)
}

fn check_name(what: &'static str, name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(Error::InvalidName { what, name: name.to_string() })
    }
}

/// `let` / `def` followed by whitespace; returns the remainder.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Byte offset of the first `=` that is not the start of `=>`.
fn find_assignment(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    (0..bytes.len()).find(|&i| bytes[i] == b'=' && bytes.get(i + 1) != Some(&b'>'))
}

fn parse_let(decl: &str, max_depth: usize) -> Result<Statement> {
    let eq = find_assignment(decl).ok_or_else(|| Error::parse(LET_FORMAT))?;
    let name = decl[..eq].trim();
    check_name("variable", name)?;
    let value = parse_str(&decl[eq + 1..], max_depth)?;
    Ok(Statement::Let { name: name.to_string(), value })
}

fn parse_params(list: &str) -> Result<Vec<String>> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut seen = HashSet::new();
    let mut params = Vec::new();
    for raw in list.split(',') {
        let param = raw.trim();
        check_name("parameter", param)?;
        if !seen.insert(param) {
            return Err(Error::DuplicateParam(param.to_string()));
        }
        params.push(param.to_string());
    }
    Ok(params)
}

fn parse_def(definition: &str, max_depth: usize) -> Result<Statement> {
    let caps = DEF_RE.captures(definition).ok_or_else(|| Error::parse(DEF_FORMAT))?;
    let name = &caps[1];
    let body_src = &caps[3];
    // `def f(x) => ..` is not a definition.
    if body_src.starts_with('>') {
        return Err(Error::parse(DEF_FORMAT));
    }

    check_name("function", name)?;
    let params = parse_params(&caps[2])?;
    let body = parse_str(body_src, max_depth)?;

    Ok(Statement::Def {
        name: name.to_string(),
        func: FunctionDef { params: params.into(), body: Rc::new(body) },
    })
}

/// Classifies and parses one input line. Nothing is evaluated here.
pub fn parse_statement(line: &str, max_depth: usize) -> Result<Statement> {
    let line = line.trim();
    if let Some(decl) = strip_keyword(line, "let") {
        return parse_let(decl, max_depth);
    }
    if let Some(definition) = strip_keyword(line, "def") {
        return parse_def(definition, max_depth);
    }
    parse_str(line, max_depth).map(Statement::Expr)
}
