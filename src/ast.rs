// src/ast.rs

use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            '^' => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    /// Binding strength; every level is left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 3,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// AST Definition
//
// Lambda parameters and bodies sit behind `Rc` so closures and function
// tables share them with the tree instead of copying.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(String),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
    /// `(fn(..) => ..)(args)`; the callee is always a `Lambda` when built by the parser.
    AnonymousCall(Box<Expr>, Vec<Expr>),
    Lambda(Rc<[String]>, Rc<Expr>),
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn lambda(params: Vec<String>, body: Expr) -> Self {
        Expr::Lambda(params.into(), Rc::new(body))
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary(op, _, _) => op.precedence(),
            // A lambda body runs to the end of the input, so it never sits
            // bare inside an operator.
            Expr::Lambda(..) => 0,
            _ => u8::MAX,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

fn fmt_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Binary(op, left, right) => {
                let prec = op.precedence();
                left.fmt_operand(f, prec)?;
                write!(f, " {} ", op)?;
                right.fmt_operand(f, prec + 1)
            }
            Expr::Call(name, args) => {
                write!(f, "{}(", name)?;
                fmt_list(f, args)?;
                write!(f, ")")
            }
            Expr::AnonymousCall(callee, args) => {
                write!(f, "({})(", callee)?;
                fmt_list(f, args)?;
                write!(f, ")")
            }
            Expr::Lambda(params, body) => {
                write!(f, "fn(")?;
                fmt_list(f, params)?;
                write!(f, ") => {}", body)
            }
        }
    }
}
