// src/evaluator.rs

use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::ast::{BinaryOp, Expr};
use crate::error::{Error, Result};
use crate::stack::ensure_sufficient_stack;
use crate::value::{CapturedEnv, Closure, FunctionDef, Frame, Value};

/// The two session-wide tables. Evaluation only reads them.
#[derive(Debug, Default, Clone)]
pub struct Globals {
    pub variables: HashMap<String, Value>,
    pub functions: HashMap<String, FunctionDef>,
}

impl Globals {
    pub fn clear(&mut self) {
        self.variables.clear();
        self.functions.clear();
    }
}

/// Read-only view of the globals plus the depth budget for one evaluation.
pub struct Evaluator<'g> {
    globals: &'g Globals,
    depth: usize,
    max_depth: usize,
}

impl<'g> Evaluator<'g> {
    pub fn new(globals: &'g Globals, max_depth: usize) -> Self {
        Evaluator { globals, depth: 0, max_depth }
    }

    /// Evaluates `expr` with an empty local frame.
    pub fn eval_top(&mut self, expr: &Expr) -> Result<Value> {
        expr.eval(&Frame::new(), self)
    }

    fn lookup<'a>(&self, name: &str, frame: &'a Frame) -> Option<&'a Value>
    where
        'g: 'a,
    {
        frame.get(name).or_else(|| self.globals.variables.get(name))
    }

    /// Numeric bindings visible right now; locals shadow globals and
    /// closure-valued bindings are left out.
    fn capture(&self, frame: &Frame) -> CapturedEnv {
        let mut env = CapturedEnv::new();
        for (name, value) in frame {
            if let Value::Number(n) = value {
                env.insert(name.clone(), *n);
            }
        }
        for (name, value) in &self.globals.variables {
            if let Value::Number(n) = value {
                env.entry(name.clone()).or_insert(*n);
            }
        }
        env
    }
}

fn check_arity(name: &str, params: &[String], args: &[Expr]) -> Result<()> {
    if params.len() != args.len() {
        return Err(Error::Arity {
            name: name.to_string(),
            expected: params.len(),
            got: args.len(),
        });
    }
    Ok(())
}

/// Evaluates call arguments left to right in the caller's frame and binds
/// them to `params` on top of `frame`.
fn bind_args(
    mut frame: Frame,
    params: &[String],
    args: &[Expr],
    caller: &Frame,
    ev: &mut Evaluator,
) -> Result<Frame> {
    for (param, arg) in params.iter().zip(args) {
        let value = arg.eval(caller, ev)?;
        frame.insert(param.clone(), value);
    }
    Ok(frame)
}

/// Calls a `def` function: a fresh frame holding only the parameters.
fn apply_function(
    name: &str,
    func: &FunctionDef,
    args: &[Expr],
    caller: &Frame,
    ev: &mut Evaluator,
) -> Result<Value> {
    check_arity(name, &func.params, args)?;
    trace!(function = name, argc = args.len(), "calling named function");
    let local = bind_args(Frame::with_capacity(args.len()), &func.params, args, caller, ev)?;
    func.body.eval(&local, ev)
}

/// Calls a closure: its captured snapshot plus the parameters.
fn apply_closure(
    name: &str,
    closure: &Closure,
    args: &[Expr],
    caller: &Frame,
    ev: &mut Evaluator,
) -> Result<Value> {
    check_arity(name, &closure.params, args)?;
    trace!(closure = name, argc = args.len(), captured = closure.env.len(), "calling closure");
    let seed: Frame = closure
        .env
        .iter()
        .map(|(k, v)| (k.clone(), Value::Number(*v)))
        .collect();
    let local = bind_args(seed, &closure.params, args, caller, ev)?;
    closure.body.eval(&local, ev)
}

fn apply_binary(op: BinaryOp, left: f64, right: f64) -> Result<f64> {
    match op {
        BinaryOp::Add => Ok(left + right),
        BinaryOp::Sub => Ok(left - right),
        BinaryOp::Mul => Ok(left * right),
        BinaryOp::Div if right == 0.0 => Err(Error::DivisionByZero),
        BinaryOp::Div => Ok(left / right),
        BinaryOp::Pow => Ok(left.powf(right)),
    }
}

// --- The Evaluator ---
impl Expr {
    pub fn eval(&self, frame: &Frame, ev: &mut Evaluator) -> Result<Value> {
        if ev.depth >= ev.max_depth {
            return Err(Error::StackDepthExceeded { limit: ev.max_depth });
        }
        ev.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_node(frame, ev));
        ev.depth -= 1;
        result
    }

    fn eval_node(&self, frame: &Frame, ev: &mut Evaluator) -> Result<Value> {
        match self {
            Expr::Number(n) => Ok(Value::Number(*n)),

            Expr::Var(name) => ev
                .lookup(name, frame)
                .cloned()
                .ok_or_else(|| Error::UndefinedVariable(name.clone())),

            Expr::Binary(op, left, right) => {
                let left = left.eval(frame, ev)?;
                let right = right.eval(frame, ev)?;
                match (left, right) {
                    (Value::Number(l), Value::Number(r)) => apply_binary(*op, l, r).map(Value::Number),
                    _ => Err(Error::Type(
                        "Cannot perform arithmetic operations on functions".to_string(),
                    )),
                }
            }

            Expr::Lambda(params, body) => {
                let closure = Closure {
                    params: Rc::clone(params),
                    body: Rc::clone(body),
                    env: ev.capture(frame),
                };
                Ok(Value::Closure(Rc::new(closure)))
            }

            Expr::AnonymousCall(callee, args) => match callee.eval(frame, ev)? {
                Value::Closure(closure) => apply_closure("<anonymous>", &closure, args, frame, ev),
                Value::Number(n) => Err(Error::Type(format!(
                    "Expected a function, got the number {}",
                    n
                ))),
            },

            Expr::Call(name, args) => {
                let globals = ev.globals;
                if let Some(func) = globals.functions.get(name) {
                    return apply_function(name, func, args, frame, ev);
                }
                // A number bound to the name shadows but is not callable.
                match ev.lookup(name, frame) {
                    Some(Value::Closure(closure)) => {
                        let closure = Rc::clone(closure);
                        apply_closure(name, &closure, args, frame, ev)
                    }
                    Some(Value::Number(_)) | None => Err(Error::UndefinedCallable(name.clone())),
                }
            }
        }
    }
}
