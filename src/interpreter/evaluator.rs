use crate::ast::{Expr, Stmt, StmtKind};
use crate::diagnostic::Span;
use crate::token::{BinaryOp, Token};
use crate::value::Value;
use super::environment::Environment;
use super::error::{InterpreterError, RunError, Thrown};
use super::parser::parse_program;
use std::cmp::Ordering;
use std::io::{self, Stdout, Write};

/// Variable holding the 1-based index of the innermost running `spin`.
pub const SPIN_ITERATION: &str = "spin_iteration";

pub struct Interpreter<W: Write = Stdout> {
    env: Environment,
    out: W,
}

impl Interpreter<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// An interpreter whose `shout` lines go to `out`.
    pub fn with_output(out: W) -> Self {
        Self {
            env: Environment::new(),
            out,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Drops every binding so the next run starts from an empty namespace.
    pub fn reset(&mut self) {
        self.env.clear();
    }

    /// Parses `source` and runs it against the current environment.
    pub fn interpret(&mut self, source: &str) -> Result<(), RunError> {
        let program = parse_program(source)?;
        self.run(&program.statements)
    }

    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), RunError> {
        for stmt in stmts {
            self.execute_statement(stmt)?;
        }
        Ok(())
    }

    fn execute_statement(&mut self, statement: &Stmt) -> Result<(), RunError> {
        let span = statement.span;
        tracing::trace!(statement = statement.kind.keyword(), start = span.start, "execute");

        match &statement.kind {
            StmtKind::Declare { name, value } => {
                let val = self.evaluate_at(value, span)?;
                self.env.declare(name.as_str(), val);
            }
            StmtKind::Assign { name, value } => {
                if !self.env.contains(name) {
                    return Err(InterpreterError::undeclared_variable(name.as_str()).at(span).into());
                }
                let val = self.evaluate_at(value, span)?;
                self.env.assign(name, val).map_err(|e| e.at(span))?;
            }
            StmtKind::Print(message) => {
                let val = self.evaluate_at(message, span)?;
                writeln!(self.out, "{}", val)
                    .map_err(|e| InterpreterError::output(e.to_string()).at(span))?;
            }
            StmtKind::If { condition, body } => {
                if self.evaluate_at(condition, span)?.is_truthy() {
                    self.run(body)?;
                }
            }
            StmtKind::Loop { count, body } => {
                let count = self.evaluate_at(count, span)?;
                let times = count.as_integer().ok_or_else(|| {
                    InterpreterError::loop_count_not_integer(count.to_string()).at(span)
                })?;
                for iteration in 1..=times {
                    tracing::trace!(iteration, times, "spin");
                    self.env.declare(SPIN_ITERATION, Value::Integer(iteration));
                    // A failure in the body leaves the counter bound.
                    self.run(body)?;
                }
                self.env.remove(SPIN_ITERATION).map_err(|e| e.at(span))?;
            }
            StmtKind::Throw(message) => {
                let message = self.evaluate_at(message, span)?.to_string();
                tracing::debug!(%message, "bail");
                return Err(RunError::Thrown(Thrown { message, span }));
            }
        }
        Ok(())
    }

    fn evaluate_at(&self, expr: &Expr, span: Span) -> Result<Value, InterpreterError> {
        self.evaluate(expr).map_err(|e| e.at(span))
    }

    pub fn evaluate(&self, expr: &Expr) -> Result<Value, InterpreterError> {
        self.reduce(&expr.tokens)
    }

    /// A single token is a literal or a variable. Otherwise the leftmost
    /// operator splits the tokens; its left side holds no operator and its
    /// right side reduces the same way, so `a - b + c` is `a - (b + c)`.
    /// There is no precedence and parentheses do not group.
    ///
    /// Runs as a loop: operands are read left to right, then the operators
    /// are applied from the innermost (rightmost) split outwards.
    fn reduce(&self, tokens: &[Token]) -> Result<Value, InterpreterError> {
        let mut pending: Vec<(Value, BinaryOp)> = Vec::new();
        let mut rest = tokens;
        let tail = loop {
            let split = rest
                .iter()
                .enumerate()
                .find_map(|(i, token)| token.as_operator().map(|op| (i, op)));
            match split {
                Some((index, op)) => {
                    pending.push((self.operand(&rest[..index])?, op));
                    rest = &rest[index + 1..];
                }
                None => break self.operand(rest)?,
            }
        };

        pending
            .into_iter()
            .rev()
            .try_fold(tail, |right, (left, op)| eval_binary_op(&left, op, &right))
    }

    /// An operator-free run of tokens; anything but a single token is malformed.
    fn operand(&self, tokens: &[Token]) -> Result<Value, InterpreterError> {
        match tokens {
            [token] => self.evaluate_token(token),
            _ => Err(InterpreterError::invalid_expression(
                Expr::new(tokens.to_vec()).to_string(),
            )),
        }
    }

    fn evaluate_token(&self, token: &Token) -> Result<Value, InterpreterError> {
        match token {
            Token::Integer(n) => Ok(Value::Integer(*n)),
            Token::String(s) => Ok(Value::string(s)),
            Token::Ident(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| InterpreterError::unknown_token(name.as_str())),
            other => Err(InterpreterError::unknown_token(other.to_string())),
        }
    }
}

fn eval_binary_op(left: &Value, op: BinaryOp, right: &Value) -> Result<Value, InterpreterError> {
    match op {
        BinaryOp::Add => match (left, right) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::string(format!("{}{}", left, right)))
            }
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_add(*b)
                .map(Value::Integer)
                .ok_or_else(|| InterpreterError::arithmetic_overflow(format!("{} + {}", a, b))),
            _ => Err(InterpreterError::type_error(format!(
                "cannot add {} and {}",
                left.type_name(),
                right.type_name()
            ))),
        },
        BinaryOp::Sub => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_sub(*b)
                .map(Value::Integer)
                .ok_or_else(|| InterpreterError::arithmetic_overflow(format!("{} - {}", a, b))),
            _ => Err(InterpreterError::type_error(format!(
                "cannot subtract {} from {}",
                right.type_name(),
                left.type_name()
            ))),
        },
        BinaryOp::Greater => compare(left, op, right, Ordering::is_gt),
        BinaryOp::Less => compare(left, op, right, Ordering::is_lt),
        BinaryOp::GreaterEq => compare(left, op, right, Ordering::is_ge),
        BinaryOp::LessEq => compare(left, op, right, Ordering::is_le),
        BinaryOp::Eq => compare(left, op, right, Ordering::is_eq),
        BinaryOp::NotEq => compare(left, op, right, Ordering::is_ne),
    }
}

fn compare(
    left: &Value,
    op: BinaryOp,
    right: &Value,
    test: fn(Ordering) -> bool,
) -> Result<Value, InterpreterError> {
    left.compare(right)
        .map(|ordering| Value::Bool(test(ordering)))
        .ok_or_else(|| {
            InterpreterError::type_error(format!(
                "cannot compare {} with {} using `{}`",
                left.type_name(),
                right.type_name(),
                op
            ))
        })
}

/// Parses and runs `source`, writing printed lines to `out`.
pub fn run_source<W: Write>(source: &str, out: W) -> Result<(), RunError> {
    Interpreter::with_output(out).interpret(source)
}

/// Parses and runs `source`, returning everything it printed.
pub fn parse_and_run(source: &str) -> Result<String, RunError> {
    let mut buffer = Vec::new();
    run_source(source, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
