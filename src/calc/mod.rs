//! Built-in calculator evaluator.
//!
//! Evaluates one arithmetic statement per line and keeps a running memory:
//! `ans` is the last result and `name = expr` stores a variable. Results are
//! rendered as `= value`, failures as `ERROR: message`, both newline
//! terminated, so the REPL can write them without inspection. The line
//! commands `help` and `reset` list the built-ins and clear memory.

mod lexer;
mod parser;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::f64::consts;
use std::fmt;

use crate::eval::Evaluator;

use parser::{BinOp, Expr, Statement};

const WELCOME: &str = include_str!("../templates/welcome.txt");

/// Name under which the last result is stored.
pub const ANSWER: &str = "ans";

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

// ---------------------------------------------------------------------------
// CalcError
// ---------------------------------------------------------------------------

/// Reasons a line cannot be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    UnexpectedChar(char),
    InvalidNumber(String),
    UnexpectedToken(String),
    UnexpectedEnd,
    MissingClose,
    TooDeep,
    UnknownName(String),
    UnknownFunction(String),
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },
    ReadOnly(String),
    DivisionByZero,
    NotFinite,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar(ch) => write!(f, "unexpected character '{ch}'"),
            Self::InvalidNumber(text) => write!(f, "invalid number '{text}'"),
            Self::UnexpectedToken(text) => write!(f, "unexpected '{text}'"),
            Self::UnexpectedEnd => write!(f, "unexpected end of expression"),
            Self::MissingClose => write!(f, "missing ')'"),
            Self::TooDeep => write!(f, "expression nested too deeply"),
            Self::UnknownName(name) => write!(f, "unknown name '{name}'"),
            Self::UnknownFunction(name) => write!(f, "unknown function '{name}'"),
            Self::Arity {
                name,
                expected,
                got,
            } => write!(f, "{name} takes {expected} argument(s), got {got}"),
            Self::ReadOnly(name) => write!(f, "'{name}' is built in and cannot be assigned"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::NotFinite => write!(f, "result is not a finite number"),
        }
    }
}

impl std::error::Error for CalcError {}

// ---------------------------------------------------------------------------
// Built-ins
// ---------------------------------------------------------------------------

/// What a built-in name evaluates to.
#[derive(Clone, Copy)]
enum Kind {
    Constant(f64),
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
}

struct Builtin {
    name: &'static str,
    kind: Kind,
    about: &'static str,
}

const fn builtin(name: &'static str, kind: Kind, about: &'static str) -> Builtin {
    Builtin { name, kind, about }
}

fn reciprocal(x: f64) -> f64 {
    1.0 / x
}

/// Listed by `help` in this order.
static BUILTINS: &[Builtin] = &[
    builtin("pi", Kind::Constant(consts::PI), "circle constant"),
    builtin("e", Kind::Constant(consts::E), "base of the natural logarithm"),
    builtin("phi", Kind::Constant(GOLDEN_RATIO), "golden ratio"),
    builtin("sqrt", Kind::Unary(f64::sqrt), "square root"),
    builtin("exp", Kind::Unary(f64::exp), "e raised to x"),
    builtin("ln", Kind::Unary(f64::ln), "natural logarithm"),
    builtin("log2", Kind::Unary(f64::log2), "base-2 logarithm"),
    builtin("log10", Kind::Unary(f64::log10), "base-10 logarithm"),
    builtin("inv", Kind::Unary(reciprocal), "reciprocal, 1/x"),
    builtin("abs", Kind::Unary(f64::abs), "absolute value"),
    builtin("sin", Kind::Unary(f64::sin), "sine (radians)"),
    builtin("cos", Kind::Unary(f64::cos), "cosine (radians)"),
    builtin("tan", Kind::Unary(f64::tan), "tangent (radians)"),
    builtin("asin", Kind::Unary(f64::asin), "inverse sine"),
    builtin("acos", Kind::Unary(f64::acos), "inverse cosine"),
    builtin("atan", Kind::Unary(f64::atan), "inverse tangent"),
    builtin("sinh", Kind::Unary(f64::sinh), "hyperbolic sine"),
    builtin("cosh", Kind::Unary(f64::cosh), "hyperbolic cosine"),
    builtin("tanh", Kind::Unary(f64::tanh), "hyperbolic tangent"),
    builtin("asinh", Kind::Unary(f64::asinh), "inverse hyperbolic sine"),
    builtin("acosh", Kind::Unary(f64::acosh), "inverse hyperbolic cosine"),
    builtin("atanh", Kind::Unary(f64::atanh), "inverse hyperbolic tangent"),
    builtin("floor", Kind::Unary(f64::floor), "round toward negative infinity"),
    builtin("ceil", Kind::Unary(f64::ceil), "round toward positive infinity"),
    builtin("round", Kind::Unary(f64::round), "round half away from zero"),
    builtin("pow", Kind::Binary(f64::powf), "x raised to y"),
    builtin("min", Kind::Binary(f64::min), "smaller of x and y"),
    builtin("max", Kind::Binary(f64::max), "larger of x and y"),
];

/// Whole-line commands; they cannot be used as variable names.
const HELP: &str = "help";
const RESET: &str = "reset";

fn lookup_builtin(name: &str) -> Option<Kind> {
    BUILTINS.iter().find(|b| b.name == name).map(|b| b.kind)
}

fn is_reserved(name: &str) -> bool {
    lookup_builtin(name).is_some() || matches!(name, ANSWER | HELP | RESET)
}

/// Text returned for `help`: one ` name - description` line per built-in.
pub fn help_text() -> String {
    let mut text = String::from("Supported functions and constants:\n");
    for b in BUILTINS {
        let signature = match b.kind {
            Kind::Constant(_) => b.name.to_string(),
            Kind::Unary(_) => format!("{}(x)", b.name),
            Kind::Binary(_) => format!("{}(x, y)", b.name),
        };
        text.push_str(&format!(" {signature} - {}\n", b.about));
    }
    text.push_str(" reset - clear ans and all variables\n");
    text
}

/// Result of one evaluated line.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Blank input; nothing to print.
    Blank,
    Value(f64),
    /// Output of a line command such as `help`.
    Text(String),
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Stateful calculator; memory survives across lines.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    memory: BTreeMap<String, f64>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one line. Blank input yields [`Reply::Blank`] and leaves
    /// memory alone; `help` and `reset` are handled before parsing.
    pub fn eval_line(&mut self, line: &str) -> Result<Reply, CalcError> {
        match line.trim() {
            "" => return Ok(Reply::Blank),
            HELP => return Ok(Reply::Text(help_text())),
            RESET => {
                let cleared = self.memory.len();
                self.memory.clear();
                tracing::debug!(cleared, "calculator memory reset");
                return Ok(Reply::Text("memory cleared\n".to_string()));
            }
            _ => {}
        }
        let tokens = lexer::tokenize(line)?;
        let value = match parser::parse(&tokens)? {
            Statement::Assign(name, expr) => {
                if is_reserved(&name) {
                    return Err(CalcError::ReadOnly(name));
                }
                let value = self.eval(&expr)?;
                self.memory.insert(name, value);
                value
            }
            Statement::Expr(expr) => self.eval(&expr)?,
        };
        self.memory.insert(ANSWER.to_string(), value);
        Ok(Reply::Value(value))
    }

    /// Stored value for `name`, including `ans`.
    pub fn recall(&self, name: &str) -> Option<f64> {
        self.memory.get(name).copied()
    }

    fn eval(&self, expr: &Expr) -> Result<f64, CalcError> {
        let value = match expr {
            Expr::Number(n) => *n,
            Expr::Name(name) => self.lookup(name)?,
            Expr::Neg(inner) => -self.eval(inner)?,
            Expr::Binary(op, lhs, rhs) => {
                let (a, b) = (self.eval(lhs)?, self.eval(rhs)?);
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div | BinOp::Rem if b == 0.0 => {
                        return Err(CalcError::DivisionByZero)
                    }
                    BinOp::Div => a / b,
                    BinOp::Rem => a % b,
                    BinOp::Pow => a.powf(b),
                }
            }
            Expr::Call(name, args) => self.call(name, args)?,
        };
        if !value.is_finite() {
            return Err(CalcError::NotFinite);
        }
        Ok(value)
    }

    fn lookup(&self, name: &str) -> Result<f64, CalcError> {
        if let Some(Kind::Constant(value)) = lookup_builtin(name) {
            return Ok(value);
        }
        if let Some(value) = self.memory.get(name) {
            return Ok(*value);
        }
        // Unset `ans` reads as zero so a first line like `ans + 1` works.
        if name == ANSWER {
            return Ok(0.0);
        }
        Err(CalcError::UnknownName(name.to_string()))
    }

    fn call(&self, name: &str, args: &[Expr]) -> Result<f64, CalcError> {
        let arity = |expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(CalcError::Arity {
                    name: name.to_string(),
                    expected,
                    got: args.len(),
                })
            }
        };

        match lookup_builtin(name) {
            Some(Kind::Constant(value)) => {
                arity(0)?;
                Ok(value)
            }
            Some(Kind::Unary(f)) => {
                arity(1)?;
                Ok(f(self.eval(&args[0])?))
            }
            Some(Kind::Binary(f)) => {
                arity(2)?;
                Ok(f(self.eval(&args[0])?, self.eval(&args[1])?))
            }
            None => Err(CalcError::UnknownFunction(name.to_string())),
        }
    }
}

/// Render a result: integral values without a fraction, others in shortest form.
pub fn format_value(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        // Also folds -0 into 0.
        return format!("{}", value as i64);
    }
    format!("{value}")
}

#[async_trait]
impl Evaluator for Calculator {
    fn welcome_banner(&self) -> String {
        WELCOME.to_string()
    }

    async fn evaluate(&mut self, line: &str) -> String {
        match self.eval_line(line) {
            Ok(Reply::Value(value)) => format!("= {}\n", format_value(value)),
            Ok(Reply::Text(text)) => text,
            Ok(Reply::Blank) => String::new(),
            Err(err) => {
                tracing::debug!(error = %err, "calculator rejected line");
                format!("ERROR: {err}\n")
            }
        }
    }
}
